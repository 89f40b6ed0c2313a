//! Primitive trait and HitInfo for ray-object intersection.

use crate::Material;
use lux_math::{Aabb, Ray, Vec2, Vec3};

/// Smallest accepted hit distance. Rejects self-intersection at the origin of
/// a bounced ray.
pub const T_MIN: f32 = 1e-4;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitInfo<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal at the intersection
    pub normal: Vec3,
    /// Primitive whose material shades this hit
    pub object: &'a dyn Primitive,
    /// Distance along the (normalized) ray
    pub distance: f32,
    /// Texture coordinates
    pub uv: Vec2,
}

impl std::fmt::Debug for HitInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitInfo")
            .field("point", &self.point)
            .field("normal", &self.normal)
            .field("distance", &self.distance)
            .field("uv", &self.uv)
            .finish_non_exhaustive()
    }
}

impl<'a> HitInfo<'a> {
    /// Pick the nearer of two optional hits. Ties keep `a`.
    #[inline]
    pub fn nearest(a: Option<HitInfo<'a>>, b: Option<HitInfo<'a>>) -> Option<HitInfo<'a>> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// True when both hits come from the same primitive instance.
    pub fn same_object(&self, other: &HitInfo<'_>) -> bool {
        std::ptr::addr_eq(self.object, other.object)
    }
}

/// Trait for objects that can be hit by rays.
pub trait Primitive: Send + Sync {
    /// Nearest intersection in front of the ray origin, if any.
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>>;

    /// Axis-aligned bounding box, `None` for unbounded primitives.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Material used to shade hits on this primitive.
    fn material(&self) -> &Material;
}

/// Nearest hit over a linear list of primitives.
pub fn intersect_all<'a>(primitives: &'a [Box<dyn Primitive>], ray: &Ray) -> Option<HitInfo<'a>> {
    primitives
        .iter()
        .fold(None, |best, p| HitInfo::nearest(best, p.intersect(ray)))
}
