//! Axis-aligned cube (box) primitive.

use crate::hittable::{HitInfo, Primitive, T_MIN};
use crate::Material;
use lux_math::{Aabb, Ray, Vec2, Vec3};

/// An axis-aligned box.
pub struct Cube {
    bounds: Aabb,
    material: Material,
}

impl Cube {
    /// Box spanning two opposite corners.
    pub fn new(a: Vec3, b: Vec3, material: Material) -> Self {
        Self {
            bounds: Aabb::from_points(a, b),
            material,
        }
    }

    /// Cube centered on `center` with the given half edge length.
    pub fn centered(center: Vec3, half_size: f32, material: Material) -> Self {
        let h = Vec3::splat(half_size.abs());
        Self::new(center - h, center + h, material)
    }

    /// Axis and outward normal of the face closest to `p`.
    fn face(&self, p: Vec3) -> (usize, Vec3) {
        let mut best = (f32::INFINITY, 0, Vec3::ZERO);
        for axis in 0..3 {
            let mut n = Vec3::ZERO;
            n[axis] = 1.0;
            let to_min = (p[axis] - self.bounds.min[axis]).abs();
            let to_max = (self.bounds.max[axis] - p[axis]).abs();
            if to_min < best.0 {
                best = (to_min, axis, -n);
            }
            if to_max < best.0 {
                best = (to_max, axis, n);
            }
        }
        (best.1, best.2)
    }

    /// Projection of `p` onto the two axes of the face, normalized to the
    /// box extent.
    fn face_uv(&self, p: Vec3, axis: usize) -> Vec2 {
        let (a, b) = match axis {
            0 => (2, 1),
            1 => (0, 2),
            _ => (0, 1),
        };
        let size = self.bounds.size();
        let rel = p - self.bounds.min;
        let u = if size[a] > 0.0 { rel[a] / size[a] } else { 0.0 };
        let v = if size[b] > 0.0 { rel[b] / size[b] } else { 0.0 };
        Vec2::new(u, v)
    }
}

impl Primitive for Cube {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let (t_enter, t_exit) = self.bounds.slab_distances(ray)?;
        if t_exit < T_MIN {
            return None;
        }

        // Origin inside the box: report the exit face
        let distance = if t_enter >= T_MIN { t_enter } else { t_exit };
        let point = ray.at(distance);
        let (axis, normal) = self.face(point);

        Some(HitInfo {
            point,
            normal,
            object: self,
            distance,
            uv: self.face_uv(point, axis),
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bounds)
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Cube {
        Cube::centered(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::None)
    }

    #[test]
    fn test_cube_front_face() {
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let cube = cube();
        let hit = cube.intersect(&ray).unwrap();

        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
        assert!((hit.uv - Vec2::new(0.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_cube_side_face_normal_opposes_ray() {
        let ray = Ray::new(Vec3::new(-5.0, 0.2, -5.0), Vec3::X);
        let cube = cube();
        let hit = cube.intersect(&ray).unwrap();

        assert_eq!(hit.normal, -Vec3::X);
        assert!((hit.point.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cube_from_inside_hits_exit_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Y);
        let cube = cube();
        let hit = cube.intersect(&ray).unwrap();

        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_cube_behind_and_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(cube().intersect(&ray).is_none());

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), -Vec3::Z);
        assert!(cube().intersect(&ray).is_none());
    }
}
