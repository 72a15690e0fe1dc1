//! Color math shared with the fragment shader

use glam::Vec3;

use crate::gizmo::{GizmoAxis, GizmoPlacement};
use crate::march::{self, Ray};
use crate::object::SceneObject;
use crate::sdf::{self, Material};
use crate::settings::MarchSettings;

pub const AMBIENT: f32 = 0.2;
pub const FOG_DENSITY: f32 = 0.02;
pub const HIGHLIGHT_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const HIGHLIGHT_AMOUNT: f32 = 0.4;
pub const SKY_HORIZON: Vec3 = Vec3::new(0.78, 0.84, 0.92);
pub const SKY_ZENITH: Vec3 = Vec3::new(0.32, 0.48, 0.78);
pub const GAMMA: f32 = 2.2;
pub const NORMAL_EPSILON: f32 = 0.001;
pub const SHADOW_MAX_DISTANCE: f32 = 20.0;
pub const SHADOW_STEPS: u32 = 64;

/// Direction toward the fixed directional light.
#[must_use]
pub fn light_direction() -> Vec3 {
    Vec3::new(0.6, 0.8, 0.4).normalize()
}

/// Blend 40% toward red; applied to the active object before lighting.
#[must_use]
pub fn highlight(color: Vec3) -> Vec3 {
    color.lerp(HIGHLIGHT_COLOR, HIGHLIGHT_AMOUNT)
}

/// Vertical sky gradient for a view direction.
#[must_use]
pub fn sky(direction: Vec3) -> Vec3 {
    let t = (direction.y * 0.5 + 0.5).clamp(0.0, 1.0);
    SKY_HORIZON.lerp(SKY_ZENITH, t)
}

/// Exponential distance fog toward the sky color.
#[must_use]
pub fn fog(color: Vec3, distance: f32, sky_color: Vec3) -> Vec3 {
    let amount = 1.0 - (-FOG_DENSITY * distance).exp();
    color.lerp(sky_color, amount)
}

#[must_use]
pub fn gamma(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(1.0 / GAMMA)
}

/// Ambient plus shadowed diffuse.
#[must_use]
pub fn lambert(albedo: Vec3, normal: Vec3, shadow: f32) -> Vec3 {
    let diffuse = normal.dot(light_direction()).max(0.0);
    albedo * (AMBIENT + diffuse * shadow)
}

/// Central-difference gradient of `f`.
pub fn normal<F: Fn(Vec3) -> f32>(p: Vec3, f: F) -> Vec3 {
    let e = NORMAL_EPSILON;
    Vec3::new(
        f(p + Vec3::X * e) - f(p - Vec3::X * e),
        f(p + Vec3::Y * e) - f(p - Vec3::Y * e),
        f(p + Vec3::Z * e) - f(p - Vec3::Z * e),
    )
    .normalize_or_zero()
}

/// Binary shadow term: 0 when an object blocks the light, 1 otherwise.
///
/// Only `objects` are marched. The ground grid and the gizmo are left out
/// on purpose, so neither ever casts a shadow.
#[must_use]
pub fn shadow(p: Vec3, n: Vec3, objects: &[SceneObject], settings: &MarchSettings) -> f32 {
    let ray = Ray::new(p + n * (settings.surface_epsilon * 10.0), light_direction());
    let shadow_settings = MarchSettings {
        max_steps: SHADOW_STEPS,
        max_distance: SHADOW_MAX_DISTANCE,
        surface_epsilon: settings.surface_epsilon,
    };
    match march::march_with(&ray, &shadow_settings, |q| sdf::objects_distance(q, objects)) {
        Some(_) => 0.0,
        None => 1.0,
    }
}

/// Gamma-corrected color of one pixel ray, as produced by the fragment shader.
#[must_use]
pub fn shade_ray(
    ray: &Ray,
    objects: &[SceneObject],
    active: Option<usize>,
    settings: &MarchSettings,
) -> Vec3 {
    let sky_color = sky(ray.direction);
    let Some(hit) = march::march(ray, objects, active, settings) else {
        return gamma(sky_color);
    };

    let albedo = match hit.sample.material {
        Material::Grid => return gamma(sdf::grid_color(hit.position)),
        Material::Object => {
            let slot = hit.sample.index as usize;
            let base = objects.get(slot).map_or(Vec3::ONE, |o| o.color);
            if Some(slot) == active {
                highlight(base)
            } else {
                base
            }
        }
        Material::Gizmo(_) => GizmoAxis::from_index(hit.sample.index).map_or(Vec3::ONE, GizmoAxis::color),
    };

    let gizmo = active
        .and_then(|slot| objects.get(slot))
        .map(|o| GizmoPlacement::new(ray.origin, o.position));
    let n = normal(hit.position, |q| sdf::scene_distance(q, objects, gizmo).distance);
    let lit = lambert(albedo, n, shadow(hit.position, n, objects, settings));
    gamma(fog(lit, hit.t, sky_color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectId, Primitive};

    #[test]
    fn only_objects_cast_shadows() {
        let settings = MarchSettings::render();
        // A point just under the grid plane is still lit: the grid is not marched.
        assert_eq!(shadow(Vec3::new(0.3, -0.05, 0.3), Vec3::Y, &[], &settings), 1.0);

        let blocker = SceneObject::new(ObjectId(1), "blocker", Primitive::Sphere)
            .with_position(light_direction() * 3.0);
        assert_eq!(shadow(Vec3::ZERO, Vec3::Y, &[blocker], &settings), 0.0);
    }

    #[test]
    fn highlight_moves_forty_percent_to_red() {
        let c = highlight(Vec3::new(0.0, 1.0, 0.0));
        assert!((c - Vec3::new(0.4, 0.6, 0.0)).length() < 1e-6);
    }

    #[test]
    fn fog_is_zero_at_the_camera() {
        let c = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(fog(c, 0.0, Vec3::ONE), c);
        assert!(fog(c, 1000.0, Vec3::ONE).abs_diff_eq(Vec3::ONE, 1e-3));
    }

    #[test]
    fn miss_returns_gamma_corrected_sky() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let c = shade_ray(&ray, &[], None, &MarchSettings::render());
        assert!(c.abs_diff_eq(gamma(SKY_ZENITH), 1e-6));
    }
}
