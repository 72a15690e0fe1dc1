//! Object registry
//!
//! Authoritative list of placed objects and the packed buffer mirroring
//! them. Objects live in a dense `Vec` whose order is the buffer slot order;
//! a separate id map resolves stable ids to slots. Removal swaps the last
//! object into the hole, so slots are always `0..len` but do not follow
//! creation order. Anything outside the registry should hold on to
//! [`ObjectId`]s, never slots.

use std::collections::HashMap;

use scene::{ObjectId, SceneObject};
use tracing::{debug, warn};

use crate::gpu_types::ObjectRecord;
use crate::object_buffer::ObjectBuffer;

/// Records allocated before the first growth.
pub const DEFAULT_CAPACITY: usize = 16;

/// What a successful [`ObjectRegistry::remove`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct Removal {
    pub removed: SceneObject,
    /// Slot the removed object occupied.
    pub slot: usize,
    /// Object moved from the last slot into `slot`, if any.
    pub moved: Option<ObjectId>,
    /// Whether the removed object was selected.
    pub was_active: bool,
}

pub struct ObjectRegistry<B> {
    objects: Vec<SceneObject>,
    slots: HashMap<ObjectId, usize>,
    buffer: B,
    active: Option<ObjectId>,
}

impl<B: ObjectBuffer> ObjectRegistry<B> {
    pub fn new(buffer: B) -> Self {
        Self {
            objects: Vec::new(),
            slots: HashMap::new(),
            buffer,
            active: None,
        }
    }

    /// Append an object and upload its record, growing the buffer when full.
    ///
    /// Returns the assigned slot. Adding an id that is already live updates
    /// that object's attributes in place. The primitive kind is fixed for an
    /// object's lifetime, so an add that would change it is rejected and the
    /// live object is left untouched.
    pub fn add(&mut self, object: SceneObject) -> usize {
        if let Some(&slot) = self.slots.get(&object.id) {
            let live = &self.objects[slot];
            if live.primitive() != object.primitive() {
                warn!(
                    id = %object.id,
                    slot,
                    live = %live.primitive(),
                    rejected = %object.primitive(),
                    "id already registered with another primitive; add rejected"
                );
                return slot;
            }
            debug!(id = %object.id, slot, "object already registered; updating");
            self.objects[slot] = object;
            self.write(slot);
            return slot;
        }

        let slot = self.objects.len();
        if slot >= self.buffer.capacity() {
            let grown = (self.buffer.capacity() * 2).max(1);
            self.buffer.grow(grown);
        }
        self.slots.insert(object.id, slot);
        self.objects.push(object);
        self.write(slot);
        self.publish_count();
        slot
    }

    /// Remove an object by id with swap-compaction.
    ///
    /// Unknown or already removed ids are ignored.
    pub fn remove(&mut self, id: ObjectId) -> Option<Removal> {
        let slot = self.slots.remove(&id)?;
        let removed = self.objects.swap_remove(slot);

        let moved = self.objects.get(slot).map(|moved| moved.id);
        if let Some(moved_id) = moved {
            self.slots.insert(moved_id, slot);
            self.write(slot);
            debug!(removed = %id, moved = %moved_id, slot, "compacted object buffer");
        }
        self.publish_count();

        let was_active = self.active == Some(id);
        if was_active {
            self.active = None;
        }
        Some(Removal {
            removed,
            slot,
            moved,
            was_active,
        })
    }

    /// Re-upload one object's record. Returns `false` for stale ids.
    pub fn sync(&mut self, id: ObjectId) -> bool {
        match self.slots.get(&id) {
            Some(&slot) => {
                self.write(slot);
                true
            }
            None => false,
        }
    }

    /// Mutate a live object then sync it. The id cannot be changed through here.
    pub fn edit<F>(&mut self, id: ObjectId, f: F) -> bool
    where
        F: FnOnce(&mut SceneObject),
    {
        let Some(&slot) = self.slots.get(&id) else {
            return false;
        };
        let object = &mut self.objects[slot];
        f(object);
        object.id = id;
        self.write(slot);
        true
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots.get(&id).map(|&slot| &self.objects[slot])
    }

    /// First object with this display name, in slot order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    #[must_use]
    pub fn slot_of(&self, id: ObjectId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    #[must_use]
    pub fn object_at(&self, slot: usize) -> Option<&SceneObject> {
        self.objects.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Live objects in slot order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Select an object, or clear the selection with `None`.
    ///
    /// Selecting a stale id clears the selection and returns `false`.
    pub fn set_active(&mut self, id: Option<ObjectId>) -> bool {
        match id {
            Some(id) if self.slots.contains_key(&id) => {
                self.active = Some(id);
                true
            }
            Some(_) => {
                self.active = None;
                false
            }
            None => {
                self.active = None;
                true
            }
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    #[must_use]
    pub fn active_slot(&self) -> Option<usize> {
        self.active.and_then(|id| self.slot_of(id))
    }

    /// Active slot in the shader's encoding, `-1` for none.
    #[must_use]
    pub fn active_index(&self) -> i32 {
        self.active_slot().map_or(-1, |slot| slot as i32)
    }

    #[must_use]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    fn write(&mut self, slot: usize) {
        let record = ObjectRecord::from(&self.objects[slot]);
        self.buffer.write_record(slot, &record);
    }

    fn publish_count(&mut self) {
        self.buffer.set_count(self.objects.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_buffer::HostObjectBuffer;
    use scene::Primitive;

    #[test]
    fn add_existing_id_replaces_in_place() {
        let mut registry = ObjectRegistry::new(HostObjectBuffer::with_capacity(2));
        registry.add(SceneObject::new(ObjectId(1), "a", Primitive::Sphere));
        let slot = registry.add(SceneObject::new(ObjectId(1), "renamed", Primitive::Sphere));
        assert_eq!(slot, 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(ObjectId(1)).map(|o| o.name.as_str()), Some("renamed"));
    }

    #[test]
    fn add_existing_id_cannot_change_primitive() {
        let mut registry = ObjectRegistry::new(HostObjectBuffer::with_capacity(2));
        registry.add(SceneObject::new(ObjectId(1), "Sphere", Primitive::Sphere));
        let before = registry.buffer().record(0);
        let slot = registry.add(SceneObject::new(ObjectId(1), "Box 1", Primitive::Box));
        assert_eq!(slot, 0);
        assert_eq!(registry.len(), 1);
        let live = registry.get(ObjectId(1)).expect("live");
        assert_eq!((live.name.as_str(), live.primitive()), ("Sphere", Primitive::Sphere));
        assert_eq!(registry.buffer().record(0), before);
    }

    #[test]
    fn edit_cannot_change_id() {
        let mut registry = ObjectRegistry::new(HostObjectBuffer::with_capacity(2));
        registry.add(SceneObject::new(ObjectId(1), "a", Primitive::Box));
        assert!(registry.edit(ObjectId(1), |o| o.id = ObjectId(99)));
        assert!(registry.get(ObjectId(1)).is_some());
        assert_eq!(registry.buffer().record(0).id, 1);
    }

    #[test]
    fn selecting_stale_id_clears_selection() {
        let mut registry = ObjectRegistry::new(HostObjectBuffer::with_capacity(2));
        registry.add(SceneObject::new(ObjectId(1), "a", Primitive::Box));
        assert!(registry.set_active(Some(ObjectId(1))));
        assert!(!registry.set_active(Some(ObjectId(2))));
        assert_eq!(registry.active(), None);
        assert_eq!(registry.active_index(), -1);
    }
}
