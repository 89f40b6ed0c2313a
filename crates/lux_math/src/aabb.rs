use crate::{Mat3, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH and for primitive culling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest AABB containing every point. `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_points(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box of the 8 corners after rotating them by `rotation` about `pivot`.
    ///
    /// Conservative: the result may be larger than the rotated contents.
    pub fn rotated_about(&self, pivot: Vec3, rotation: Mat3) -> Aabb {
        let corners = self.corners().map(|c| rotation * (c - pivot) + pivot);
        let mut result = Aabb::from_points(corners[0], corners[0]);
        for &corner in &corners[1..] {
            result.min = result.min.min(corner);
            result.max = result.max.max(corner);
        }
        result
    }

    /// Slab test. Returns the entry and exit distances along the ray, which
    /// may be negative when the origin is inside or past the box.
    #[inline]
    pub fn slab_distances(&self, r: &Ray) -> Option<(f32, f32)> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let inv_d = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN (origin on a slab plane, parallel ray) leaves the bound unchanged
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Test if a ray intersects this AABB.
    ///
    /// A box straddling the origin is a hit. Only a box entirely behind the
    /// origin (both slab distances negative) is rejected.
    pub fn hit(&self, r: &Ray) -> bool {
        match self.slab_distances(r) {
            Some((t_min, t_max)) => !(t_min < 0.0 && t_max < 0.0),
            None => false,
        }
    }
}
