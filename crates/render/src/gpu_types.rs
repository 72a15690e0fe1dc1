//! GPU-compatible type definitions for rendering
//!
//! Every struct here is read by `sdf.wgsl` and must keep the exact field
//! order and padding of its WGSL twin. All types are `Pod` so they can be
//! copied straight into buffers.

use bytemuck::{Pod, Zeroable};
use scene::{HitResult, SceneObject};

/// Attribute record of one scene object, 64 bytes per slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectRecord {
    pub position: [f32; 3],
    /// [`scene::Primitive::code`].
    pub primitive: u32,
    /// Degrees per axis, applied X then Y then Z.
    pub rotation: [f32; 3],
    pub id: u32,
    pub scale: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

impl From<&SceneObject> for ObjectRecord {
    fn from(object: &SceneObject) -> Self {
        Self {
            position: object.position.to_array(),
            primitive: object.primitive().code(),
            rotation: object.rotation.to_array(),
            id: object.id.0,
            scale: object.scale.to_array(),
            _pad0: 0.0,
            color: object.color.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Per-frame uniform block shared by the shading and picking passes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    /// Pointer position in physical pixels, origin top left.
    pub mouse: [f32; 2],
    /// Seconds since start.
    pub time: f32,
    pub delta_time: f32,
    pub mouse_down: u32,
    /// Nonzero on frames that resolve a pick at `mouse`.
    pub picking: u32,
    /// Slot of the selected object, `-1` when nothing is selected.
    pub active_index: i32,
    pub render_max_steps: u32,
    pub render_max_distance: f32,
    pub render_epsilon: f32,
    pub pick_max_steps: u32,
    pub pick_max_distance: f32,
    pub pick_epsilon: f32,
    pub _pad: u32,
}

/// Camera data needed to rebuild a world-space ray per pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub inverse_view_proj: [[f32; 4]; 4],
    /// Camera position in world coordinates, `w` unused.
    pub position: [f32; 4],
}

/// Number of live records in the object buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct SceneCounts {
    pub objects: u32,
    pub _pad: [u32; 3],
}

impl SceneCounts {
    #[must_use]
    pub const fn new(objects: u32) -> Self {
        Self { objects, _pad: [0; 3] }
    }
}

/// Raw pick result as written by the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct HitRecord {
    pub kind: u32,
    pub index: i32,
}

impl HitRecord {
    pub const NONE: HitRecord = HitRecord { kind: 0, index: -1 };
}

impl From<HitRecord> for HitResult {
    fn from(record: HitRecord) -> Self {
        HitResult::from_raw(record.kind, record.index)
    }
}
