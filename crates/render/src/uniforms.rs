//! Frame uniform state with partial updates
//!
//! Callers rarely know every uniform at once: the window knows the size,
//! the pointer handlers know the mouse, the engine knows the clock. Each of
//! them sends a [`UniformPatch`] naming only what changed and
//! [`FrameState::apply`] keeps every other field as it was.

use glam::Vec2;
use scene::MarchSettings;

use crate::gpu_types::FrameUniforms;

/// Last known value of every frame uniform.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub resolution: Vec2,
    pub mouse: Vec2,
    pub time: f32,
    pub delta_time: f32,
    pub mouse_down: bool,
    pub picking: bool,
    pub active_index: i32,
    pub render: MarchSettings,
    pub pick: MarchSettings,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            resolution: Vec2::ONE,
            mouse: Vec2::ZERO,
            time: 0.0,
            delta_time: 0.0,
            mouse_down: false,
            picking: false,
            active_index: -1,
            render: MarchSettings::render(),
            pick: MarchSettings::picking(),
        }
    }
}

/// Partial uniform update. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformPatch {
    pub resolution: Option<Vec2>,
    pub mouse: Option<Vec2>,
    pub time: Option<f32>,
    pub delta_time: Option<f32>,
    pub mouse_down: Option<bool>,
    pub picking: Option<bool>,
    pub active_index: Option<i32>,
    pub render: Option<MarchSettings>,
    pub pick: Option<MarchSettings>,
}

impl UniformPatch {
    #[must_use]
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Some(Vec2::new(width as f32, height as f32));
        self
    }

    #[must_use]
    pub fn mouse(mut self, position: Vec2) -> Self {
        self.mouse = Some(position);
        self
    }

    #[must_use]
    pub fn time(mut self, time: f32, delta_time: f32) -> Self {
        self.time = Some(time);
        self.delta_time = Some(delta_time);
        self
    }

    #[must_use]
    pub fn mouse_down(mut self, down: bool) -> Self {
        self.mouse_down = Some(down);
        self
    }

    #[must_use]
    pub fn picking(mut self, picking: bool) -> Self {
        self.picking = Some(picking);
        self
    }

    #[must_use]
    pub fn active_index(mut self, index: i32) -> Self {
        self.active_index = Some(index);
        self
    }

    #[must_use]
    pub fn march_settings(mut self, render: MarchSettings, pick: MarchSettings) -> Self {
        self.render = Some(render);
        self.pick = Some(pick);
        self
    }
}

impl FrameState {
    /// Merge a patch field by field.
    pub fn apply(&mut self, patch: &UniformPatch) {
        fn merge<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        merge(&mut self.resolution, &patch.resolution);
        merge(&mut self.mouse, &patch.mouse);
        merge(&mut self.time, &patch.time);
        merge(&mut self.delta_time, &patch.delta_time);
        merge(&mut self.mouse_down, &patch.mouse_down);
        merge(&mut self.picking, &patch.picking);
        merge(&mut self.active_index, &patch.active_index);
        merge(&mut self.render, &patch.render);
        merge(&mut self.pick, &patch.pick);
    }

    #[must_use]
    pub fn to_gpu(&self) -> FrameUniforms {
        FrameUniforms {
            resolution: self.resolution.to_array(),
            mouse: self.mouse.to_array(),
            time: self.time,
            delta_time: self.delta_time,
            mouse_down: u32::from(self.mouse_down),
            picking: u32::from(self.picking),
            active_index: self.active_index,
            render_max_steps: self.render.max_steps,
            render_max_distance: self.render.max_distance,
            render_epsilon: self.render.surface_epsilon,
            pick_max_steps: self.pick.max_steps,
            pick_max_distance: self.pick.max_distance,
            pick_epsilon: self.pick.surface_epsilon,
            _pad: 0,
        }
    }
}
