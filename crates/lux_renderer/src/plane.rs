//! Infinite horizontal plane.

use crate::hittable::{HitInfo, Primitive};
use crate::Material;
use lux_math::{Aabb, Ray, Vec2, Vec3};

/// Hits closer than this are ignored, so a bounced ray never re-hits its plane.
const PLANE_T_MIN: f32 = 1e-3;

/// Plane `y = height` with an upward normal. Has no bounding box, so it lives
/// outside the BVH.
pub struct YPlane {
    height: f32,
    material: Material,
}

impl YPlane {
    pub fn new(height: f32, material: Material) -> Self {
        Self { height, material }
    }
}

impl Primitive for YPlane {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let t = -(ray.origin.y - self.height) / ray.direction.y;
        if !t.is_finite() || t < PLANE_T_MIN {
            return None;
        }

        let point = ray.at(t);
        Some(HitInfo {
            point,
            normal: Vec3::Y,
            object: self,
            distance: t,
            uv: Vec2::new(point.x.rem_euclid(1.0), point.z.rem_euclid(1.0)),
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
