//! Orbit camera feeding the ray marcher
//!
//! The camera circles a target point. Mutators only touch position, target
//! and the projection parameters; the derived matrices are rebuilt solely by
//! [`Camera::update_matrices`]. Callers must refresh after mutating and
//! before rendering or generating rays, otherwise the previous matrices are
//! used as they are.

use std::f32::consts::PI;

use glam::{Mat4, Vec2, Vec3};
use scene::Ray;

use crate::gpu_types::CameraUniform;

/// Lowest and highest polar angle an orbit may reach.
pub const POLAR_MIN: f32 = 0.1;
pub const POLAR_MAX: f32 = PI - 0.1;

/// Perspective orbit camera used by the editor
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Render target aspect ratio
    pub aspect: f32,
    /// Vertical field of view in radians
    pub fovy: f32,
    /// Near clipping plane distance
    pub znear: f32,
    /// Far clipping plane distance
    pub zfar: f32,
    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

impl Camera {
    /// Create a camera looking from `position` at `target`. Matrices are ready to use.
    #[must_use]
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            target,
            up: Vec3::Y,
            aspect,
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    /// Update aspect ratio for a new viewport size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Distance from the camera to its target.
    #[must_use]
    pub fn radius(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Angle between the up axis and the target-to-camera offset.
    #[must_use]
    pub fn polar(&self) -> f32 {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return 0.0;
        }
        (offset.y / radius).clamp(-1.0, 1.0).acos()
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Screen-space up, perpendicular to [`Camera::forward`].
    #[must_use]
    pub fn up_axis(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    /// Rotate around the target. `dx` turns the azimuth, `dy` tilts the polar angle.
    pub fn orbit(&mut self, dx: f32, dy: f32, speed: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + dx * speed;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() - dy * speed).clamp(POLAR_MIN, POLAR_MAX);
        self.position = self.target + spherical(radius, azimuth, polar);
    }

    /// Scale the orbit radius, clamped to `[min_radius, max_radius]`.
    /// Positive `delta` moves away from the target.
    ///
    /// # Panics
    ///
    /// Panics if `min_radius > max_radius` or either bound is NaN.
    pub fn zoom(&mut self, delta: f32, speed: f32, min_radius: f32, max_radius: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let factor = (1.0 + delta * speed).max(0.0);
        let zoomed = (radius * factor).clamp(min_radius, max_radius);
        self.position = self.target + offset / radius * zoomed;
    }

    /// Slide position and target together in the view plane.
    ///
    /// The shift scales with the orbit radius so a pointer drag covers a
    /// similar share of the screen at any zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        let scale = speed * self.radius().max(1.0);
        let shift = self.right() * (-dx * scale) + self.up_axis() * (dy * scale);
        self.position += shift;
        self.target += shift;
    }

    /// Recompute view, projection and their inverse from the current state.
    pub fn update_matrices(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
        self.projection = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        self.combine();
    }

    /// Override the view matrix with 16 column-major floats.
    ///
    /// Kept until the next [`Camera::update_matrices`].
    ///
    /// # Panics
    ///
    /// Panics if `matrix` does not hold exactly 16 values.
    pub fn set_view_matrix(&mut self, matrix: &[f32]) {
        self.view = matrix_from_slice("view", matrix);
        self.combine();
    }

    /// Override the projection matrix with 16 column-major floats.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` does not hold exactly 16 values.
    pub fn set_projection_matrix(&mut self, matrix: &[f32]) {
        self.projection = matrix_from_slice("projection", matrix);
        self.combine();
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    #[must_use]
    pub fn inverse_view_projection(&self) -> Mat4 {
        self.inverse_view_projection
    }

    /// World-space ray through normalized device coordinates, `y` up.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let far = self.inverse_view_projection.project_point3(ndc.extend(1.0));
        Ray::new(self.position, far - self.position)
    }

    /// World-space ray through the center of pixel `(x, y)`, origin top left.
    #[must_use]
    pub fn ray_from_pixel(&self, x: f32, y: f32, width: u32, height: u32) -> Ray {
        let ndc = Vec2::new(
            (x.floor() + 0.5) / width.max(1) as f32 * 2.0 - 1.0,
            1.0 - (y.floor() + 0.5) / height.max(1) as f32 * 2.0,
        );
        self.ray_from_ndc(ndc)
    }

    /// Data uploaded to the camera buffer each frame.
    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            inverse_view_proj: self.inverse_view_projection.to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    fn combine(&mut self) {
        self.view_projection = self.projection * self.view;
        self.inverse_view_projection = self.view_projection.inverse();
    }
}

fn spherical(radius: f32, azimuth: f32, polar: f32) -> Vec3 {
    Vec3::new(
        radius * polar.sin() * azimuth.sin(),
        radius * polar.cos(),
        radius * polar.sin() * azimuth.cos(),
    )
}

fn matrix_from_slice(kind: &str, matrix: &[f32]) -> Mat4 {
    assert_eq!(
        matrix.len(),
        16,
        "{kind} matrix needs 16 values, got {}",
        matrix.len()
    );
    Mat4::from_cols_slice(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 1.5)
    }

    #[test]
    fn orbit_keeps_radius_and_target() {
        let mut cam = camera();
        cam.orbit(40.0, 15.0, 0.01);
        assert!((cam.radius() - 10.0).abs() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn matrices_are_stale_until_refreshed() {
        let mut cam = camera();
        let before = cam.view_projection();
        cam.orbit(100.0, 0.0, 0.01);
        assert_eq!(cam.view_projection(), before);
        cam.update_matrices();
        assert_ne!(cam.view_projection(), before);
    }

    #[test]
    fn center_pixel_looks_at_target() {
        let cam = camera();
        let ray = cam.ray_from_pixel(400.0, 300.0, 800, 600);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-2), "{:?}", ray.direction);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn pan_moves_target_with_camera() {
        let mut cam = camera();
        let offset = cam.position - cam.target;
        cam.pan(10.0, 5.0, 0.01);
        assert!(((cam.position - cam.target) - offset).length() < 1e-5);
        assert!(cam.target.x < 0.0 && cam.target.y > 0.0, "{:?}", cam.target);
    }

    #[test]
    #[should_panic(expected = "16 values")]
    fn short_matrix_is_rejected() {
        camera().set_view_matrix(&[1.0; 12]);
    }

    #[test]
    fn explicit_view_matrix_is_used_for_rays() {
        let mut cam = camera();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::new(10.0, 0.0, 10.0), Vec3::Y);
        cam.set_view_matrix(&view.to_cols_array());
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!(ray.direction.abs_diff_eq(Vec3::X, 1e-2), "{:?}", ray.direction);
    }
}
