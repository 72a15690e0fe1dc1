//! Inspector edits applied to the selected object.

use glam::Vec3;
use scene::SceneObject;

/// One attribute change coming from an inspector panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldEdit {
    Position(Vec3),
    /// Degrees per axis.
    Rotation(Vec3),
    Scale(Vec3),
    /// 8-bit RGB as shown by color pickers.
    Material([u8; 3]),
}

impl FieldEdit {
    /// Write the edited attribute into `object`.
    pub fn apply(self, object: &mut SceneObject) {
        match self {
            FieldEdit::Position(v) => object.position = v,
            FieldEdit::Rotation(v) => object.rotation = v,
            FieldEdit::Scale(v) => object.scale = v,
            FieldEdit::Material([r, g, b]) => {
                object.color = Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{ObjectId, Primitive};

    #[test]
    fn material_maps_bytes_to_unit_range() {
        let mut obj = SceneObject::new(ObjectId(1), "c", Primitive::Cone);
        FieldEdit::Material([255, 0, 51]).apply(&mut obj);
        assert!((obj.color - Vec3::new(1.0, 0.0, 0.2)).length() < 1e-6);
    }

    #[test]
    fn transform_edits_touch_only_their_field() {
        let mut obj = SceneObject::new(ObjectId(1), "b", Primitive::Box);
        let before = obj.clone();
        FieldEdit::Rotation(Vec3::new(0.0, 45.0, 0.0)).apply(&mut obj);
        assert_eq!(obj.rotation, Vec3::new(0.0, 45.0, 0.0));
        assert_eq!(obj.position, before.position);
        assert_eq!(obj.scale, before.scale);
        assert_eq!(obj.color, before.color);
    }
}
