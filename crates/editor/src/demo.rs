//! Demo scene: one of each primitive in a row on the grid.

use glam::Vec3;
use scene::{IdGenerator, Primitive, SceneObject};

const SPACING: f32 = 2.5;

const COLORS: [Vec3; 6] = [
    Vec3::new(0.90, 0.35, 0.30),
    Vec3::new(0.95, 0.70, 0.25),
    Vec3::new(0.45, 0.80, 0.40),
    Vec3::new(0.30, 0.65, 0.90),
    Vec3::new(0.60, 0.45, 0.85),
    Vec3::new(0.85, 0.85, 0.85),
];

pub fn demo_scene(ids: &mut dyn IdGenerator) -> Vec<SceneObject> {
    let offset = (Primitive::ALL.len() - 1) as f32 * SPACING * 0.5;
    Primitive::ALL
        .iter()
        .zip(COLORS)
        .enumerate()
        .map(|(i, (&primitive, color))| {
            let scale = primitive.default_scale();
            // Rest every shape on the grid plane.
            let lift = match primitive {
                Primitive::Capsule => scale.x + scale.y,
                _ => scale.y,
            };
            SceneObject::new(ids.next_id(), primitive.name(), primitive)
                .with_position(Vec3::new(i as f32 * SPACING - offset, lift, 0.0))
                .with_color(color)
        })
        .collect()
}
