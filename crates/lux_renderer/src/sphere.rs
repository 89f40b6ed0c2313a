//! Sphere primitive for ray tracing.

use std::f32::consts::PI;

use crate::hittable::{HitInfo, Primitive, T_MIN};
use crate::Material;
use lux_math::{Aabb, Ray, Vec2, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Texture coordinates from the outward unit normal.
    fn sphere_uv(n: Vec3) -> Vec2 {
        let u = n.x.atan2(n.z) / (2.0 * PI) + 0.5;
        let v = n.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
        Vec2::new(u, v)
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        // Direction is unit length, so the quadratic's `a` term is 1
        let oc = self.center - ray.origin;
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Near root first; from inside the sphere only the far root is ahead
        let mut root = h - sqrtd;
        if root < T_MIN {
            root = h + sqrtd;
            if root < T_MIN {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = if self.radius > 0.0 {
            (point - self.center) / self.radius
        } else {
            -ray.direction
        };

        Some(HitInfo {
            point,
            normal,
            object: self,
            distance: root,
            uv: Self::sphere_uv(normal),
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let r = Vec3::splat(self.radius);
        Some(Aabb::from_points(self.center - r, self.center + r))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::None)
    }

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = sphere.intersect(&ray).unwrap();

        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_center_is_radius() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.5, Material::None);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, -0.4, 1.0));
        let hit = sphere.intersect(&ray).unwrap();

        assert!((hit.distance - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_miss_and_behind() {
        let sphere = unit_sphere();

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(sphere.intersect(&ray).is_none());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_bounding_box() {
        let bbox = unit_sphere().bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(-1.0, -1.0, -6.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 1.0, -4.0));
    }

    #[test]
    fn test_sphere_uv_poles_and_front() {
        let top = Sphere::sphere_uv(Vec3::Y);
        assert!((top.y - 1.0).abs() < 1e-6);

        let bottom = Sphere::sphere_uv(-Vec3::Y);
        assert!(bottom.y.abs() < 1e-6);

        // +Z maps to the center of the u range
        let front = Sphere::sphere_uv(Vec3::Z);
        assert!((front.x - 0.5).abs() < 1e-6);
        assert!((front.y - 0.5).abs() < 1e-6);
    }
}
