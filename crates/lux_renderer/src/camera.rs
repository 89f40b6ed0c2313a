//! Camera: a position plus an orthonormal basis derived from the forward
//! vector.

use lux_math::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed world up used to derive the camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pinhole camera. Lens settings live in `RenderConfig`.
///
/// `u` points toward screen-left and `v` toward screen-up. Both are
/// recomputed whenever the forward vector changes and are never set directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    u: Vec3,
    v: Vec3,
}

/// Serializable camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPlacement {
    pub position: [f32; 3],
    pub forward: [f32; 3],
}

impl Default for CameraPlacement {
    fn default() -> Self {
        Self {
            position: [-10.0, 3.0, 0.0],
            forward: [3.0, -0.5, 0.0],
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let mut camera = Self {
            position,
            forward: Vec3::Z,
            u: Vec3::X,
            v: Vec3::Y,
        };
        camera.set_forward(forward);
        camera
    }

    /// Camera at `position` looking toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    /// Set the view direction and rebuild the basis. A zero vector keeps the
    /// current direction.
    pub fn set_forward(&mut self, forward: Vec3) {
        let Some(forward) = forward.try_normalize() else {
            return;
        };
        // Looking straight up or down: world X stands in for the cross product
        let u = WORLD_UP
            .cross(forward)
            .try_normalize()
            .unwrap_or(Vec3::X);

        self.forward = forward;
        self.u = u;
        self.v = forward.cross(u).normalize();
    }

    /// Rotate position and view direction about the world Y axis through
    /// `pivot`.
    pub fn orbit_y(&mut self, radians: f32, pivot: Vec3) {
        let rot = Mat3::from_rotation_y(radians);
        self.position = rot * (self.position - pivot) + pivot;
        self.set_forward(rot * self.forward);
    }
}

impl From<CameraPlacement> for Camera {
    fn from(p: CameraPlacement) -> Self {
        Camera::new(Vec3::from(p.position), Vec3::from(p.forward))
    }
}

impl Default for Camera {
    fn default() -> Self {
        CameraPlacement::default().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(c: &Camera) {
        assert!((c.forward().length() - 1.0).abs() < 1e-5);
        assert!((c.u().length() - 1.0).abs() < 1e-5);
        assert!((c.v().length() - 1.0).abs() < 1e-5);
        assert!(c.forward().dot(c.u()).abs() < 1e-5);
        assert!(c.forward().dot(c.v()).abs() < 1e-5);
        assert!(c.u().dot(c.v()).abs() < 1e-5);
    }

    #[test]
    fn test_camera_basis_looking_down_z() {
        let c = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));

        assert_eq!(c.forward(), Vec3::Z);
        assert!((c.u() - Vec3::X).length() < 1e-6);
        assert!((c.v() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_camera_basis_stays_orthonormal() {
        let mut c = Camera::default();
        assert_orthonormal(&c);

        for dir in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.3, -0.9, 0.1),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            c.set_forward(dir);
            assert_orthonormal(&c);
        }
    }

    #[test]
    fn test_camera_degenerate_forward() {
        let mut c = Camera::new(Vec3::ZERO, Vec3::Y);
        assert_orthonormal(&c);

        c.set_forward(Vec3::ZERO);
        assert_eq!(c.forward(), Vec3::Y);
    }

    #[test]
    fn test_orbit_keeps_distance_to_pivot() {
        let mut c = Camera::looking_at(Vec3::new(10.0, 2.0, 0.0), Vec3::ZERO);
        c.orbit_y(0.5, Vec3::ZERO);

        assert!((c.position().length() - Vec3::new(10.0, 2.0, 0.0).length()).abs() < 1e-4);
        assert!((c.position().y - 2.0).abs() < 1e-5);
        // Still looking at the pivot
        let to_pivot = (-c.position()).normalize();
        assert!((c.forward() - to_pivot).length() < 1e-4);
        assert_orthonormal(&c);
    }
}
