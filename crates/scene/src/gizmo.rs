//! Translation gizmo geometry and drag math
//!
//! The gizmo is three axis lines with a cone arrowhead each, centered on the
//! selected object and scaled with its distance to the camera so it keeps a
//! steady on-screen size.

use glam::{Vec2, Vec3};

use crate::sdf::{sd_capsule, sd_cone};

/// Length of an axis line before scaling.
pub const LINE_LENGTH: f32 = 1.0;
/// Radius of an axis line before scaling.
pub const LINE_RADIUS: f32 = 0.02;
/// Height of an arrowhead before scaling.
pub const ARROW_LENGTH: f32 = 0.25;
/// Base radius of an arrowhead before scaling.
pub const ARROW_RADIUS: f32 = 0.08;
/// Gizmo size per unit of camera distance.
pub const SCREEN_SCALE: f32 = 0.15;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(GizmoAxis::X),
            1 => Some(GizmoAxis::Y),
            2 => Some(GizmoAxis::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    /// Display color of the handle.
    #[must_use]
    pub const fn color(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::new(0.9, 0.2, 0.2),
            GizmoAxis::Y => Vec3::new(0.2, 0.85, 0.25),
            GizmoAxis::Z => Vec3::new(0.25, 0.4, 0.95),
        }
    }

    /// Rotate `p` so this axis becomes local +Y.
    fn to_axis_frame(self, p: Vec3) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::new(p.y, p.x, p.z),
            GizmoAxis::Y => p,
            GizmoAxis::Z => Vec3::new(p.x, p.z, p.y),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GizmoPart {
    Arrow,
    Line,
}

/// Where the gizmo is drawn this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GizmoPlacement {
    pub center: Vec3,
    pub size: f32,
}

impl GizmoPlacement {
    /// Place the gizmo on `center`, sized for a camera at `eye`.
    #[must_use]
    pub fn new(eye: Vec3, center: Vec3) -> Self {
        Self {
            center,
            size: gizmo_size(eye, center),
        }
    }
}

#[must_use]
pub fn gizmo_size(eye: Vec3, center: Vec3) -> f32 {
    ((eye - center).length() * SCREEN_SCALE).max(0.05)
}

/// Distance to one axis handle, split into line and arrowhead.
#[must_use]
pub fn axis_distance(p: Vec3, axis: GizmoAxis, gizmo: GizmoPlacement) -> (f32, GizmoPart) {
    let s = gizmo.size;
    let local = axis.to_axis_frame(p - gizmo.center);

    let half_line = 0.5 * LINE_LENGTH * s;
    let line = sd_capsule(local - Vec3::new(0.0, half_line, 0.0), LINE_RADIUS * s, half_line);

    let half_arrow = 0.5 * ARROW_LENGTH * s;
    let arrow_center = LINE_LENGTH * s + half_arrow;
    let arrow = sd_cone(local - Vec3::new(0.0, arrow_center, 0.0), ARROW_RADIUS * s, half_arrow);

    if arrow < line {
        (arrow, GizmoPart::Arrow)
    } else {
        (line, GizmoPart::Line)
    }
}

/// Distance to the closest handle of the gizmo.
#[must_use]
pub fn gizmo_distance(p: Vec3, gizmo: GizmoPlacement) -> (f32, GizmoAxis, GizmoPart) {
    let mut best = (f32::MAX, GizmoAxis::X, GizmoPart::Line);
    for axis in GizmoAxis::ALL {
        let (d, part) = axis_distance(p, axis, gizmo);
        if d < best.0 {
            best = (d, axis, part);
        }
    }
    best
}

/// World-space offset for a pointer drag constrained to `axis`.
///
/// The axis is projected onto the camera's screen basis. Screen Y grows
/// downward, so the vertical component is flipped. The pointer delta is
/// projected onto that screen direction and scaled by the distance from the
/// camera to the object, which keeps far objects from crawling and near ones
/// from jumping. An axis pointing straight at the camera does not move.
#[must_use]
pub fn drag_offset(
    axis: GizmoAxis,
    pointer_delta: Vec2,
    camera_right: Vec3,
    camera_up: Vec3,
    distance: f32,
    sensitivity: f32,
) -> Vec3 {
    let dir = axis.direction();
    let screen = Vec2::new(dir.dot(camera_right), -dir.dot(camera_up));
    let len = screen.length();
    if len < 1e-3 {
        return Vec3::ZERO;
    }
    let amount = pointer_delta.dot(screen / len) * distance * sensitivity;
    dir * amount
}
