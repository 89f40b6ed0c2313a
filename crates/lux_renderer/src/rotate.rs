//! Rotation wrapper around another primitive.

use crate::hittable::{HitInfo, Primitive};
use crate::Material;
use lux_math::{Aabb, Mat3, Ray, Vec3};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn rotation(self, radians: f32) -> Mat3 {
        match self {
            Axis::X => Mat3::from_rotation_x(radians),
            Axis::Y => Mat3::from_rotation_y(radians),
            Axis::Z => Mat3::from_rotation_z(radians),
        }
    }
}

/// Rotates its target about one world axis through the center of the
/// target's bounding box.
///
/// Rays are rotated into the target's frame, hits are rotated back. The box
/// is the extent of the 8 rotated corners of the target box, computed once.
pub struct Rotate {
    target: Box<dyn Primitive>,
    to_local: Mat3,
    to_world: Mat3,
    pivot: Vec3,
    bbox: Option<Aabb>,
}

impl Rotate {
    pub fn new(axis: Axis, degrees: f32, target: Box<dyn Primitive>) -> Self {
        let to_world = axis.rotation(degrees.to_radians());
        let to_local = to_world.transpose();
        let target_box = target.bounding_box();
        let pivot = target_box.map_or(Vec3::ZERO, |b| b.center());

        Self {
            bbox: target_box.map(|b| b.rotated_about(pivot, to_world)),
            target,
            to_local,
            to_world,
            pivot,
        }
    }

    pub fn x(degrees: f32, target: Box<dyn Primitive>) -> Self {
        Self::new(Axis::X, degrees, target)
    }

    pub fn y(degrees: f32, target: Box<dyn Primitive>) -> Self {
        Self::new(Axis::Y, degrees, target)
    }

    pub fn z(degrees: f32, target: Box<dyn Primitive>) -> Self {
        Self::new(Axis::Z, degrees, target)
    }
}

impl Primitive for Rotate {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let local = Ray::new(
            self.to_local * (ray.origin - self.pivot) + self.pivot,
            self.to_local * ray.direction,
        );
        let hit = self.target.intersect(&local)?;

        Some(HitInfo {
            point: self.to_world * (hit.point - self.pivot) + self.pivot,
            normal: self.to_world * hit.normal,
            ..hit
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn material(&self) -> &Material {
        self.target.material()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cube;

    fn long_box() -> Box<dyn Primitive> {
        // 4 units along X, 1 along Y and Z, centered on (0, 0, -5)
        Box::new(Cube::new(
            Vec3::new(-2.0, -0.5, -5.5),
            Vec3::new(2.0, 0.5, -4.5),
            Material::None,
        ))
    }

    #[test]
    fn test_rotate_y_swaps_extent() {
        let rotated = Rotate::y(90.0, long_box());
        let bbox = rotated.bounding_box().unwrap();

        assert!((bbox.size() - Vec3::new(1.0, 1.0, 4.0)).length() < 1e-4);
        assert!((bbox.center() - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotate_y_moves_surface() {
        let rotated = Rotate::y(90.0, long_box());

        // Unrotated front face is at z = -4.5; rotated it reaches z = -3
        let hit = rotated.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);

        // The unrotated box would be hit here, the rotated one is not
        let ray = Ray::new(Vec3::new(1.5, 0.0, 0.0), -Vec3::Z);
        assert!(rotated.intersect(&ray).is_none());
    }

    #[test]
    fn test_rotate_box_contains_rotated_corners() {
        let target = long_box();
        let corners = target.bounding_box().unwrap().corners();
        let rotated = Rotate::new(Axis::Z, 30.0, target);
        let bbox = rotated.bounding_box().unwrap();
        let rot = Mat3::from_rotation_z(30f32.to_radians());
        let pivot = Vec3::new(0.0, 0.0, -5.0);

        for c in corners {
            let p = rot * (c - pivot) + pivot;
            assert!(p.cmpge(bbox.min - 1e-4).all());
            assert!(p.cmple(bbox.max + 1e-4).all());
        }
    }

    #[test]
    fn test_rotate_forwards_material() {
        let target = Box::new(Cube::centered(Vec3::ZERO, 1.0, Material::light(Vec3::ONE)));
        let rotated = Rotate::x(45.0, target);
        assert!(matches!(rotated.material(), Material::DiffuseLight { .. }));
    }
}
