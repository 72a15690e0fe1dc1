//! Placed primitives
//!
//! A [`SceneObject`] is identity, transform and material only. Where the
//! object sits in the GPU buffer is tracked by the registry in the render
//! crate, never by the object itself, so a removed object cannot hold on to
//! a stale buffer handle or slot.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::{ObjectId, Primitive};

/// One primitive placed in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Stable identifier, never reused after removal.
    pub id: ObjectId,
    /// Display label. Not required to be unique.
    pub name: String,
    /// World-space center.
    pub position: Vec3,
    /// Rotation in degrees per axis, applied X then Y then Z (intrinsic).
    pub rotation: Vec3,
    /// Kind-specific size parameters, see [`Primitive`].
    pub scale: Vec3,
    /// Linear RGB in `0..=1`.
    pub color: Vec3,
    primitive: Primitive,
}

impl SceneObject {
    /// Create an object at the origin with the kind's default scale and a neutral color.
    pub fn new(id: ObjectId, name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            id,
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: primitive.default_scale(),
            color: Vec3::new(0.8, 0.8, 0.8),
            primitive,
        }
    }

    /// The primitive kind. Fixed for the object's lifetime.
    #[must_use]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Object-to-world rotation.
    #[must_use]
    pub fn rotation_quat(&self) -> Quat {
        let r = self.rotation * (std::f32::consts::PI / 180.0);
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }

    /// Transform a world-space point into the object's local frame.
    #[must_use]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation_quat().inverse() * (world - self.position)
    }
}
