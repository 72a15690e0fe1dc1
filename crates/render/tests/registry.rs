use glam::Vec3;
use render::{HostObjectBuffer, ObjectBuffer, ObjectRecord, ObjectRegistry};
use scene::{IdGenerator, ObjectId, Primitive, SceneObject, SequentialIds};

fn registry(capacity: usize) -> ObjectRegistry<HostObjectBuffer> {
    ObjectRegistry::new(HostObjectBuffer::with_capacity(capacity))
}

fn object(ids: &mut SequentialIds, name: &str) -> SceneObject {
    let id = ids.next_id();
    let i = id.0 as f32;
    SceneObject::new(id, name, Primitive::ALL[id.0 as usize % Primitive::ALL.len()])
        .with_position(Vec3::new(i, 0.5 * i, -i))
        .with_color(Vec3::new(0.1, 0.5, (i * 0.1).fract()))
}

/// Every live object sits at its mapped slot, slots are `0..len`, and the
/// buffer bytes at each slot mirror the object.
fn assert_consistent(registry: &ObjectRegistry<HostObjectBuffer>) {
    assert_eq!(registry.buffer().count() as usize, registry.len());
    for (slot, object) in registry.iter().enumerate() {
        assert_eq!(registry.slot_of(object.id), Some(slot));
        assert_eq!(registry.buffer().record(slot), ObjectRecord::from(object));
    }
}

#[test]
fn compaction_invariant_holds_for_random_sequences() {
    let rng = fastrand::Rng::with_seed(7);
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(2);
    let mut live: Vec<ObjectId> = Vec::new();

    for step in 0..500 {
        if live.is_empty() || rng.u8(..) < 150 {
            let obj = object(&mut ids, &format!("o{step}"));
            live.push(obj.id);
            reg.add(obj);
        } else {
            let id = live.swap_remove(rng.usize(..live.len()));
            assert!(reg.remove(id).is_some());
        }
        assert_eq!(reg.len(), live.len());
        assert_consistent(&reg);
    }
}

#[test]
fn growth_preserves_existing_records_byte_for_byte() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    for i in 0..4 {
        reg.add(object(&mut ids, &format!("o{i}")));
    }
    let before = reg.buffer().bytes().to_vec();
    assert_eq!(reg.buffer().grow_events(), 0);

    reg.add(object(&mut ids, "overflow"));
    assert_eq!(reg.buffer().grow_events(), 1);
    assert_eq!(reg.buffer().capacity(), 8);
    assert_eq!(&reg.buffer().bytes()[..before.len()], before.as_slice());
    assert_consistent(&reg);
}

#[test]
fn removal_reassigns_only_the_last_object() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(8);
    for i in 0..5 {
        reg.add(object(&mut ids, &format!("o{i}")));
    }
    let slots_before: Vec<_> = reg.iter().map(|o| (o.id, reg.slot_of(o.id))).collect();
    let victim = reg.object_at(1).map(|o| o.id).expect("slot 1");
    let last = reg.object_at(4).map(|o| o.id).expect("slot 4");

    let removal = reg.remove(victim).expect("live");
    assert_eq!(removal.slot, 1);
    assert_eq!(removal.moved, Some(last));
    assert_eq!(reg.slot_of(last), Some(1));
    for (id, slot) in slots_before {
        if id != victim && id != last {
            assert_eq!(reg.slot_of(id), slot, "{id} moved");
        }
    }
    assert_consistent(&reg);
}

#[test]
fn removing_last_object_moves_nothing() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    reg.add(object(&mut ids, "a"));
    let b = object(&mut ids, "b");
    let b_id = b.id;
    reg.add(b);
    let removal = reg.remove(b_id).expect("live");
    assert_eq!(removal.moved, None);
    assert_eq!(reg.len(), 1);
}

#[test]
fn sync_is_idempotent() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    let obj = object(&mut ids, "a");
    let id = obj.id;
    reg.add(obj);

    assert!(reg.edit(id, |o| o.scale = Vec3::new(0.3, 0.6, 0.9)));
    let once = reg.buffer().bytes().to_vec();
    assert!(reg.sync(id));
    assert!(reg.sync(id));
    assert_eq!(reg.buffer().bytes(), once.as_slice());
    assert_eq!(reg.buffer().record(0).scale, [0.3, 0.6, 0.9]);
}

#[test]
fn stale_ids_are_silent_no_ops() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    let obj = object(&mut ids, "a");
    let id = obj.id;
    reg.add(obj);
    reg.remove(id);

    assert!(reg.remove(id).is_none());
    assert!(!reg.sync(id));
    assert!(!reg.edit(id, |o| o.position = Vec3::ONE));
    assert!(reg.remove(ObjectId(999)).is_none());
    assert_eq!(reg.buffer().count(), 0);
}

#[test]
fn removing_active_object_clears_selection() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    let a = object(&mut ids, "a");
    let b = object(&mut ids, "b");
    let (a_id, b_id) = (a.id, b.id);
    reg.add(a);
    reg.add(b);

    assert!(reg.set_active(Some(b_id)));
    assert_eq!(reg.active_index(), 1);
    let removal = reg.remove(a_id).expect("live");
    assert!(!removal.was_active);
    // The selection follows the id to its new slot.
    assert_eq!(reg.active_index(), 0);

    let removal = reg.remove(b_id).expect("live");
    assert!(removal.was_active);
    assert_eq!(reg.active(), None);
    assert_eq!(reg.active_index(), -1);
}

#[test]
fn scenario_remove_first_of_three() {
    let mut reg = registry(4);
    let a = SceneObject::new(ObjectId(0xA1), "A", Primitive::Sphere);
    let b = SceneObject::new(ObjectId(0xB1), "B", Primitive::Box);
    let c = SceneObject::new(ObjectId(0xC1), "C", Primitive::Torus);
    assert_eq!(reg.add(a), 0);
    assert_eq!(reg.add(b), 1);
    assert_eq!(reg.add(c), 2);

    reg.remove(ObjectId(0xA1));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.slot_of(ObjectId(0xC1)), Some(0));
    assert_eq!(reg.slot_of(ObjectId(0xB1)), Some(1));
    let names: Vec<_> = reg.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["C", "B"]);

    reg.remove(ObjectId(0xB1));
    let names: Vec<_> = reg.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["C"]);
    assert_eq!(reg.buffer().count(), 1);
    assert_consistent(&reg);
}

#[test]
fn lookup_by_name_and_id() {
    let mut ids = SequentialIds::starting_at(1);
    let mut reg = registry(4);
    let a = object(&mut ids, "twin");
    let b = object(&mut ids, "twin");
    let b_id = b.id;
    reg.add(a.clone());
    reg.add(b);
    assert_eq!(reg.find_by_name("twin").map(|o| o.id), Some(a.id));
    assert_eq!(reg.get(b_id).map(|o| o.id), Some(b_id));
    assert!(reg.find_by_name("missing").is_none());
}
