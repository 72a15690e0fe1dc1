//! Signed distance functions
//!
//! Every function here has a twin of the same name in `sdf.wgsl`. The CPU
//! versions exist so picking, shading and drag math can be checked without a
//! GPU; change both sides together.

use glam::{Vec2, Vec3, Vec3Swizzles};

use crate::gizmo::{self, GizmoAxis, GizmoPart, GizmoPlacement};
use crate::object::SceneObject;
use crate::types::Primitive;

/// Half extent of the ground grid on X and Z.
pub const GRID_EXTENT: f32 = 50.0;
/// Distance between grid lines.
pub const GRID_SPACING: f32 = 1.0;
/// Half width (and half thickness) of a grid line.
pub const GRID_LINE_HALF_WIDTH: f32 = 0.01;

const MIN_EXTENT: f32 = 1e-4;

/// What a distance sample hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Material {
    Grid,
    Object,
    Gizmo(GizmoPart),
}

/// Closest surface at a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneSample {
    pub distance: f32,
    pub material: Material,
    /// Slot index for objects, axis index for gizmo parts, `-1` for the grid.
    pub index: i32,
}

impl SceneSample {
    const FAR: SceneSample = SceneSample {
        distance: f32::MAX,
        material: Material::Grid,
        index: -1,
    };

    fn closer(self, other: SceneSample) -> SceneSample {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

/// Axis-aligned ellipsoid with radii `r`. Exact for spheres, a bound otherwise.
#[must_use]
pub fn sd_ellipsoid(p: Vec3, r: Vec3) -> f32 {
    let r = r.max(Vec3::splat(MIN_EXTENT));
    let k0 = (p / r).length();
    let k1 = (p / (r * r)).length();
    if k1 <= f32::EPSILON {
        return -r.min_element();
    }
    k0 * (k0 - 1.0) / k1
}

/// Box with half extents `b`.
#[must_use]
pub fn sd_box(p: Vec3, b: Vec3) -> f32 {
    let q = p.abs() - b;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Torus in the XZ plane. `t.x` is the major radius, `t.y` the tube radius.
#[must_use]
pub fn sd_torus(p: Vec3, t: Vec2) -> f32 {
    let q = Vec2::new(p.xz().length() - t.x, p.y);
    q.length() - t.y
}

/// Capped cylinder along Y.
#[must_use]
pub fn sd_cylinder(p: Vec3, radius: f32, half_height: f32) -> f32 {
    let d = Vec2::new(p.xz().length() - radius, p.y.abs() - half_height);
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
}

/// Cone along Y with its base at `-half_height` and apex at `+half_height`.
#[must_use]
pub fn sd_cone(p: Vec3, radius: f32, half_height: f32) -> f32 {
    let h = half_height.max(MIN_EXTENT);
    let q = Vec2::new(p.xz().length(), p.y);
    let k1 = Vec2::new(0.0, h);
    let k2 = Vec2::new(-radius, 2.0 * h);
    let edge = if q.y < 0.0 { radius } else { 0.0 };
    let ca = Vec2::new(q.x - q.x.min(edge), q.y.abs() - h);
    let cb = q - k1 + k2 * ((k1 - q).dot(k2) / k2.dot(k2)).clamp(0.0, 1.0);
    let s = if cb.x < 0.0 && ca.y < 0.0 { -1.0 } else { 1.0 };
    s * ca.dot(ca).min(cb.dot(cb)).sqrt()
}

/// Capsule along Y around the segment `[-half_length, half_length]`.
#[must_use]
pub fn sd_capsule(p: Vec3, radius: f32, half_length: f32) -> f32 {
    let mut q = p;
    q.y -= q.y.clamp(-half_length, half_length);
    q.length() - radius
}

/// Distance to a primitive centered at the origin in its local frame.
#[must_use]
pub fn primitive_distance(p: Vec3, primitive: Primitive, scale: Vec3) -> f32 {
    match primitive {
        Primitive::Sphere => sd_ellipsoid(p, scale),
        Primitive::Box => sd_box(p, scale),
        Primitive::Torus => sd_torus(p, scale.xy()),
        Primitive::Cylinder => sd_cylinder(p, scale.x, scale.y),
        Primitive::Cone => sd_cone(p, scale.x, scale.y),
        Primitive::Capsule => sd_capsule(p, scale.x, scale.y),
    }
}

/// Distance from a world-space point to an object.
#[must_use]
pub fn object_distance(p: Vec3, object: &SceneObject) -> f32 {
    primitive_distance(object.to_local(p), object.primitive(), object.scale)
}

/// Distance to the tiled ground grid on the `y = 0` plane.
///
/// Lines run along X and Z every [`GRID_SPACING`] units, bounded to
/// [`GRID_EXTENT`]. Each term is exact along its own axis, so the max is a
/// safe lower bound for marching.
#[must_use]
pub fn grid_distance(p: Vec3) -> f32 {
    let line = |v: f32| {
        let half = 0.5 * GRID_SPACING;
        ((v + half).rem_euclid(GRID_SPACING) - half).abs()
    };
    let lines = line(p.x).min(line(p.z)) - GRID_LINE_HALF_WIDTH;
    let slab = p.y.abs() - GRID_LINE_HALF_WIDTH;
    let bound = p.x.abs().max(p.z.abs()) - GRID_EXTENT;
    slab.max(lines).max(bound)
}

/// Flat color of the grid at a surface point; the two world axes are tinted.
#[must_use]
pub fn grid_color(p: Vec3) -> Vec3 {
    let axis_width = 2.0 * GRID_LINE_HALF_WIDTH;
    if p.z.abs() < axis_width {
        Vec3::new(0.7, 0.25, 0.25)
    } else if p.x.abs() < axis_width {
        Vec3::new(0.25, 0.35, 0.7)
    } else {
        Vec3::splat(0.45)
    }
}

/// Closest object by slot order.
#[must_use]
pub fn objects_distance(p: Vec3, objects: &[SceneObject]) -> SceneSample {
    objects
        .iter()
        .enumerate()
        .fold(SceneSample::FAR, |best, (slot, object)| {
            best.closer(SceneSample {
                distance: object_distance(p, object),
                material: Material::Object,
                index: slot as i32,
            })
        })
}

/// Closest gizmo handle.
#[must_use]
pub fn gizmo_sample(p: Vec3, gizmo: GizmoPlacement) -> SceneSample {
    let (distance, axis, part) = gizmo::gizmo_distance(p, gizmo);
    SceneSample {
        distance,
        material: Material::Gizmo(part),
        index: GizmoAxis::index(axis) as i32,
    }
}

/// Whole-scene distance: grid, every object and, when present, the gizmo.
#[must_use]
pub fn scene_distance(p: Vec3, objects: &[SceneObject], gizmo: Option<GizmoPlacement>) -> SceneSample {
    let grid = SceneSample {
        distance: grid_distance(p),
        material: Material::Grid,
        index: -1,
    };
    let mut best = grid.closer(objects_distance(p, objects));
    if let Some(gizmo) = gizmo {
        best = best.closer(gizmo_sample(p, gizmo));
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn sphere_is_exact() {
        let d = sd_ellipsoid(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(1.0));
        assert!((d - 2.0).abs() < EPS);
        assert!(sd_ellipsoid(Vec3::ZERO, Vec3::splat(1.0)) < 0.0);
    }

    #[test]
    fn box_inside_and_outside() {
        let b = Vec3::new(1.0, 2.0, 3.0);
        assert!((sd_box(Vec3::new(2.0, 0.0, 0.0), b) - 1.0).abs() < EPS);
        assert!((sd_box(Vec3::ZERO, b) + 1.0).abs() < EPS);
    }

    #[test]
    fn torus_ring_is_on_surface() {
        let t = Vec2::new(1.0, 0.25);
        assert!(sd_torus(Vec3::new(1.25, 0.0, 0.0), t).abs() < EPS);
        assert!((sd_torus(Vec3::ZERO, t) - 0.75).abs() < EPS);
    }

    #[test]
    fn cylinder_caps_and_side() {
        assert!((sd_cylinder(Vec3::new(0.0, 2.0, 0.0), 0.5, 1.0) - 1.0).abs() < EPS);
        assert!((sd_cylinder(Vec3::new(1.5, 0.0, 0.0), 0.5, 1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn cone_has_base_at_bottom() {
        // On the base disc edge.
        assert!(sd_cone(Vec3::new(0.5, -1.0, 0.0), 0.5, 1.0).abs() < EPS);
        // Apex.
        assert!(sd_cone(Vec3::new(0.0, 1.0, 0.0), 0.5, 1.0).abs() < EPS);
        // Below the base.
        assert!((sd_cone(Vec3::new(0.0, -2.0, 0.0), 0.5, 1.0) - 1.0).abs() < EPS);
        assert!(sd_cone(Vec3::ZERO, 0.5, 1.0) < 0.0);
    }

    #[test]
    fn capsule_end_caps_are_round() {
        assert!((sd_capsule(Vec3::new(0.0, 2.0, 0.0), 0.5, 1.0) - 0.5).abs() < EPS);
        assert!((sd_capsule(Vec3::new(1.0, 0.3, 0.0), 0.5, 1.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn grid_is_hollow_between_lines() {
        assert!(grid_distance(Vec3::new(0.5, 0.0, 0.5)) > 0.4);
        assert!(grid_distance(Vec3::new(1.0, 0.0, 0.5)) <= 0.0);
        assert!(grid_distance(Vec3::new(-3.0, 0.0, 0.2)) <= 0.0);
        assert!(grid_distance(Vec3::new(60.0, 0.0, 0.0)) > 9.0);
    }

    #[test]
    fn scene_distance_reports_slot_of_closest_object() {
        let a = SceneObject::new(crate::ObjectId(1), "a", Primitive::Sphere)
            .with_position(Vec3::new(0.0, 2.0, 0.0));
        let b = SceneObject::new(crate::ObjectId(2), "b", Primitive::Box)
            .with_position(Vec3::new(5.0, 2.0, 0.0));
        let s = scene_distance(Vec3::new(5.0, 3.0, 0.0), &[a, b], None);
        assert_eq!(s.material, Material::Object);
        assert_eq!(s.index, 1);
        assert!((s.distance - 0.5).abs() < EPS);
    }
}
