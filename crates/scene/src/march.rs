//! CPU reference ray marcher and picker
//!
//! Same loops as the fragment shader, so hits and picks can be asserted in
//! plain tests. The editor itself renders and picks on the GPU.

use glam::Vec3;

use crate::gizmo::{GizmoPart, GizmoPlacement};
use crate::object::SceneObject;
use crate::sdf::{self, Material, SceneSample};
use crate::settings::MarchSettings;

/// A ray with a normalized direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Surface reached by a march.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarchHit {
    /// Distance travelled along the ray.
    pub t: f32,
    pub position: Vec3,
    pub sample: SceneSample,
    pub steps: u32,
}

/// Kind of thing a picking pass landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    None,
    Object,
    GizmoArrow,
    GizmoLine,
}

impl HitKind {
    /// Code written by the shader. Must match the `HIT_*` constants in `sdf.wgsl`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            HitKind::None => 0,
            HitKind::Object => 1,
            HitKind::GizmoArrow => 2,
            HitKind::GizmoLine => 3,
        }
    }

    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => HitKind::Object,
            2 => HitKind::GizmoArrow,
            3 => HitKind::GizmoLine,
            _ => HitKind::None,
        }
    }

    #[must_use]
    pub const fn is_gizmo(self) -> bool {
        matches!(self, HitKind::GizmoArrow | HitKind::GizmoLine)
    }
}

/// Result of one picking request.
///
/// `index` is an object slot for [`HitKind::Object`] and an axis index
/// (0, 1, 2) for gizmo hits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HitResult {
    pub kind: HitKind,
    pub index: i32,
}

impl HitResult {
    pub const NONE: HitResult = HitResult {
        kind: HitKind::None,
        index: -1,
    };

    #[must_use]
    pub const fn new(kind: HitKind, index: i32) -> Self {
        Self { kind, index }
    }

    /// Decode the `(kind, index)` pair read back from the GPU.
    /// Unknown kinds and negative indices decode as [`HitResult::NONE`].
    #[must_use]
    pub const fn from_raw(kind: u32, index: i32) -> Self {
        let kind = HitKind::from_code(kind);
        if matches!(kind, HitKind::None) || index < 0 {
            Self::NONE
        } else {
            Self { kind, index }
        }
    }

    #[must_use]
    pub const fn to_raw(self) -> (u32, i32) {
        (self.kind.code(), self.index)
    }

    #[must_use]
    pub const fn is_hit(self) -> bool {
        !matches!(self.kind, HitKind::None)
    }
}

impl Default for HitResult {
    fn default() -> Self {
        Self::NONE
    }
}

/// Generic marching loop over any distance function.
pub fn march_with<F>(ray: &Ray, settings: &MarchSettings, mut map: F) -> Option<MarchHit>
where
    F: FnMut(Vec3) -> SceneSample,
{
    let mut t = 0.0_f32;
    for step in 0..settings.max_steps {
        let p = ray.at(t);
        let sample = map(p);
        if sample.distance < settings.surface_epsilon {
            return Some(MarchHit {
                t,
                position: p,
                sample,
                steps: step + 1,
            });
        }
        t += sample.distance;
        if t > settings.max_distance {
            break;
        }
    }
    None
}

/// March the full scene: grid, objects and the gizmo of the active slot.
#[must_use]
pub fn march(
    ray: &Ray,
    objects: &[SceneObject],
    active: Option<usize>,
    settings: &MarchSettings,
) -> Option<MarchHit> {
    let gizmo = gizmo_for(ray, objects, active);
    march_with(ray, settings, |p| sdf::scene_distance(p, objects, gizmo))
}

/// Resolve what a ray points at, the way the shader's picking pass does.
///
/// Gizmo handles of the active object are tested first so they stay
/// grabbable even where they overlap the object. The grid is never pickable.
#[must_use]
pub fn pick(
    ray: &Ray,
    objects: &[SceneObject],
    active: Option<usize>,
    settings: &MarchSettings,
) -> HitResult {
    if let Some(gizmo) = gizmo_for(ray, objects, active) {
        if let Some(hit) = march_with(ray, settings, |p| sdf::gizmo_sample(p, gizmo)) {
            let kind = match hit.sample.material {
                Material::Gizmo(GizmoPart::Arrow) => HitKind::GizmoArrow,
                _ => HitKind::GizmoLine,
            };
            return HitResult::new(kind, hit.sample.index);
        }
    }
    match march_with(ray, settings, |p| sdf::objects_distance(p, objects)) {
        Some(hit) => HitResult::new(HitKind::Object, hit.sample.index),
        None => HitResult::NONE,
    }
}

fn gizmo_for(ray: &Ray, objects: &[SceneObject], active: Option<usize>) -> Option<GizmoPlacement> {
    active
        .and_then(|slot| objects.get(slot))
        .map(|object| GizmoPlacement::new(ray.origin, object.position))
}
