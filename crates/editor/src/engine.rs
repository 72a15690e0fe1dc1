//! Editor engine
//!
//! Owns the camera, the ray marcher and the render target, and turns pointer
//! input plus pick results into camera moves, selection changes and gizmo
//! drags. Window glue lives in [`crate::run`]; everything here is driven by
//! plain method calls so tests can use an offscreen target.

use glam::{Vec2, Vec3};
use render::{Camera, GpuContext, PickDispatch, RayMarcher, RenderError, RenderTarget, ShaderError, UniformPatch};
use scene::{HitResult, IdGenerator, ObjectId, Primitive, SaltedCounter, SceneObject};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EditorConfig, NavigationConfig};
use crate::demo::demo_scene;
use crate::field::FieldEdit;
use crate::input::{Gesture, InputState, PointerButton, PressTracker};
use crate::selection::{PickTarget, Selection};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Hooks for an external inspector. Every method defaults to doing nothing.
///
/// Only selection changes that come from the viewport (picks, removal,
/// keyboard) are reported; [`Engine::select_object`] is the inspector's own
/// call and stays silent.
pub trait EditorListener {
    fn object_selected(&mut self, _object: &SceneObject) {}
    fn object_unselected(&mut self, _id: ObjectId) {}
    fn object_edited(&mut self, _object: &SceneObject) {}
}

/// Listener that reports through `tracing`.
#[derive(Debug, Default)]
pub struct LogListener;

impl EditorListener for LogListener {
    fn object_selected(&mut self, object: &SceneObject) {
        info!(id = %object.id, name = %object.name, "selected");
    }

    fn object_unselected(&mut self, id: ObjectId) {
        info!(%id, "unselected");
    }

    fn object_edited(&mut self, object: &SceneObject) {
        debug!(id = %object.id, position = ?object.position, "edited");
    }
}

pub struct Engine {
    context: GpuContext,
    target: RenderTarget,
    marcher: RayMarcher,
    camera: Camera,
    navigation: NavigationConfig,
    selection: Selection,
    input: InputState,
    presses: PressTracker,
    ids: Box<dyn IdGenerator>,
    listener: Box<dyn EditorListener>,
    spawned: usize,
    clock: Option<(f64, f64)>,
}

impl Engine {
    /// Build the engine. The config is validated first.
    pub fn new(context: GpuContext, target: RenderTarget, config: &EditorConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut marcher = RayMarcher::new(&context, target.format(), config.object_capacity)?;
        let (width, height) = target.size();
        marcher.apply(
            &UniformPatch::default()
                .resolution(width, height)
                .march_settings(config.render, config.picking),
        );

        let mut camera = Camera::new(config.camera.position, config.camera.target, 1.0);
        camera.fovy = config.camera.fovy_degrees.to_radians();
        camera.resize(width, height);
        camera.update_matrices();

        Ok(Self {
            context,
            target,
            marcher,
            camera,
            navigation: config.navigation.clone(),
            selection: Selection::Idle,
            input: InputState::default(),
            presses: PressTracker::default(),
            ids: Box::new(SaltedCounter::new()),
            listener: Box::new(LogListener),
            spawned: 0,
            clock: None,
        })
    }

    /// Engine drawing into an offscreen texture of the given size.
    pub fn headless(config: &EditorConfig, width: u32, height: u32) -> Result<Self, EngineError> {
        // Fail before touching the adapter.
        config.validate()?;
        let context = GpuContext::headless()?;
        let target = RenderTarget::offscreen(&context, width, height);
        Self::new(context, target, config)
    }

    pub fn set_listener(&mut self, listener: Box<dyn EditorListener>) {
        self.listener = listener;
    }

    pub fn set_id_generator(&mut self, ids: Box<dyn IdGenerator>) {
        self.ids = ids;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera. Call [`Camera::update_matrices`] after changing it.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.marcher.registry().objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.marcher.registry().get(id)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.id()
    }

    pub fn gesture(&self) -> Gesture {
        self.input.gesture()
    }

    pub fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        let slot = self.marcher.registry_mut().add(object);
        debug!(%id, slot, "object added");
        id
    }

    /// Add a fresh primitive at the camera target.
    pub fn spawn(&mut self, primitive: Primitive) -> ObjectId {
        self.spawned += 1;
        let id = self.ids.next_id();
        let name = format!("{} {}", primitive.name(), self.spawned);
        let object = SceneObject::new(id, name, primitive).with_position(self.camera.target);
        self.add_object(object)
    }

    /// Add the demo scene with ids from the engine's generator. Returns the
    /// number of objects added.
    pub fn load_demo(&mut self) -> usize {
        let objects = demo_scene(self.ids.as_mut());
        let count = objects.len();
        for object in objects {
            self.add_object(object);
        }
        count
    }

    /// Remove an object. Returns false for unknown ids.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let Some(removal) = self.marcher.registry_mut().remove(id) else {
            return false;
        };
        debug!(%id, slot = removal.slot, moved = ?removal.moved, "object removed");
        let next = self.selection.on_removed(id);
        if next != self.selection {
            self.selection = next;
            self.listener.object_unselected(id);
        }
        true
    }

    pub fn remove_selected(&mut self) -> bool {
        self.selected().is_some_and(|id| self.remove_object(id))
    }

    /// Select from the inspector. No listener hooks fire.
    ///
    /// Returns false, and clears the selection, for an unknown id.
    pub fn select_object(&mut self, id: Option<ObjectId>) -> bool {
        let known = self.marcher.registry_mut().set_active(id);
        self.selection = match self.marcher.registry().active() {
            Some(id) => Selection::Selected(id),
            None => Selection::Idle,
        };
        known
    }

    /// Clear the selection from the viewport.
    pub fn deselect(&mut self) {
        self.change_selection(Selection::Idle);
    }

    /// Apply an inspector edit to the selected object.
    pub fn apply_field_edit(&mut self, edit: FieldEdit) -> bool {
        match self.selected() {
            Some(id) => self.edit_object(id, |object| edit.apply(object)),
            None => false,
        }
    }

    /// Move the orbit target onto the selected object.
    pub fn recenter(&mut self) {
        let Some(center) = self.selected().and_then(|id| self.object(id)).map(|o| o.position) else {
            return;
        };
        let offset = self.camera.position - self.camera.target;
        self.camera.target = center;
        self.camera.position = center + offset;
        self.camera.update_matrices();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.target.resize(&self.context.device, width, height);
        self.camera.resize(width, height);
        self.camera.update_matrices();
        self.marcher.apply(&UniformPatch::default().resolution(width, height));
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.target.reconfigure(&self.context.device);
    }

    /// Resolve the pixel at `(x, y)` during the next frame.
    pub fn request_pick(&mut self, x: f32, y: f32) {
        self.presses.untracked();
        self.marcher.request_pick(Vec2::new(x, y));
    }

    /// Swap in new shader source, keeping the current pipeline on failure.
    pub fn reload_shader(&mut self, source: &str) -> Result<(), ShaderError> {
        self.marcher.reload_shader(source)
    }

    /// Draw one frame. `timestamp_ms` comes from the frame clock.
    pub fn render(&mut self, timestamp_ms: f64) -> Result<(), wgpu::SurfaceError> {
        let (start, last) = self.clock.unwrap_or((timestamp_ms, timestamp_ms));
        self.clock = Some((start, timestamp_ms));
        let time = ((timestamp_ms - start) / 1000.0) as f32;
        let delta = ((timestamp_ms - last) / 1000.0) as f32;
        self.marcher.apply(&UniformPatch::default().time(time, delta));

        self.poll_pick();

        let frame = self.target.acquire()?;
        let dispatch = self.marcher.render(&self.camera, &frame.view);
        frame.present();

        match dispatch {
            PickDispatch::Issued => self.presses.issued(),
            PickDispatch::Dropped => {
                if self.presses.dropped() {
                    self.input.resolve(false);
                }
            }
            PickDispatch::NoRequest => {}
        }
        Ok(())
    }

    /// Wait for the pick issued by the last frame and act on it.
    pub fn finish_pick(&mut self) -> Option<HitResult> {
        let hit = self.marcher.read_pick_blocking()?;
        self.handle_pick(hit);
        Some(hit)
    }

    pub fn pointer_down(&mut self, button: PointerButton) {
        let position = self.input.position();
        if self.input.press(button) {
            self.presses.press();
            self.marcher.request_pick(position);
        }
        self.marcher.apply(&UniformPatch::default().mouse(position).mouse_down(true));
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        self.input.release(button);
        if button == PointerButton::Primary {
            self.selection = self.selection.on_release();
        }
        let down = self.input.any_held();
        self.marcher.apply(&UniformPatch::default().mouse_down(down));
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        let delta = self.input.move_to(position);
        self.marcher.apply(&UniformPatch::default().mouse(position));
        match self.input.gesture() {
            Gesture::Orbiting => {
                self.camera.orbit(-delta.x, delta.y, self.navigation.orbit_speed);
                self.camera.update_matrices();
            }
            Gesture::Panning => {
                self.camera.pan(delta.x, delta.y, self.navigation.pan_speed);
                self.camera.update_matrices();
            }
            Gesture::Dragging => self.drag(delta),
            Gesture::Idle | Gesture::Resolving => {}
        }
    }

    /// Wheel notches, positive scrolling away from the user.
    pub fn wheel(&mut self, delta: f32) {
        let nav = &self.navigation;
        self.camera.zoom(-delta, nav.zoom_speed, nav.min_radius, nav.max_radius);
        self.camera.update_matrices();
    }

    fn poll_pick(&mut self) {
        if let Some(hit) = self.marcher.poll_pick() {
            self.handle_pick(hit);
        }
    }

    fn handle_pick(&mut self, hit: HitResult) {
        let registry = self.marcher.registry();
        let target = PickTarget::resolve(hit, |slot| registry.object_at(slot).map(|o| o.id));
        if hit.is_hit() && target == PickTarget::Nothing {
            warn!(?hit, "pick result refers to a slot that no longer exists");
        }
        // A result for an older press still selects, but cannot start a drag
        // or settle the gesture of the press now held.
        let current = self.presses.completed();
        let next = self.selection.on_target(target, current && self.input.primary_held());
        if current {
            self.input.resolve(next.drag_axis().is_some());
        }
        self.change_selection(next);
    }

    fn change_selection(&mut self, next: Selection) {
        let previous = self.selection.id();
        self.selection = next;
        if previous == next.id() {
            return;
        }
        self.marcher.registry_mut().set_active(next.id());
        if let Some(id) = previous {
            self.listener.object_unselected(id);
        }
        if let Some(object) = next.id().and_then(|id| self.marcher.registry().get(id)) {
            self.listener.object_selected(object);
        }
    }

    fn drag(&mut self, delta: Vec2) {
        let Selection::Dragging { id, axis } = self.selection else {
            return;
        };
        let Some(position) = self.object(id).map(|o| o.position) else {
            return;
        };
        let (_, height) = self.target.size();
        let sensitivity = 2.0 * (self.camera.fovy * 0.5).tan() / height as f32;
        let distance = (self.camera.position - position).length();
        let offset = scene::gizmo::drag_offset(
            axis,
            delta,
            self.camera.right(),
            self.camera.up_axis(),
            distance,
            sensitivity,
        );
        if offset != Vec3::ZERO {
            self.edit_object(id, |object| object.position += offset);
        }
    }

    fn edit_object(&mut self, id: ObjectId, f: impl FnOnce(&mut SceneObject)) -> bool {
        if !self.marcher.registry_mut().edit(id, f) {
            return false;
        }
        if let Some(object) = self.marcher.registry().get(id) {
            self.listener.object_edited(object);
        }
        true
    }
}
