//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitInfo, Primitive, T_MIN};
use crate::Material;
use lux_core::Vertex;
use lux_math::{Aabb, Ray, Vec2, Vec3};

/// Hit points are pushed this far off the surface, toward the ray, to keep
/// bounced rays from re-hitting the same triangle.
const SURFACE_OFFSET: f32 = 1e-4;

/// A triangle primitive with per-vertex texture coordinates and normals.
pub struct Triangle {
    vertices: [Vertex; 3],
    /// Pre-computed face normal (unit length, zero if degenerate)
    face_normal: Vec3,
    material: Material,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], material: Material) -> Self {
        let [a, b, c] = vertices.map(|v| v.position);
        Self {
            vertices,
            face_normal: (b - a).cross(c - a).normalize_or_zero(),
            material,
        }
    }

    /// Flat triangle from bare positions.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self::new([Vertex::new(a), Vertex::new(b), Vertex::new(c)], material)
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let [v0, v1, v2] = &self.vertices;
        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;

        let pvec = ray.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - v0.position;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t < T_MIN {
            return None;
        }

        let w = 1.0 - u - v;
        let uv = w * v0.uv + u * v1.uv + v * v2.uv;
        let uv = Vec2::new(uv.x.rem_euclid(1.0), uv.y.rem_euclid(1.0));

        // Both normals face the incoming ray
        let facing = |n: Vec3| if n.dot(ray.direction) > 0.0 { -n } else { n };
        let flat = facing(self.face_normal);
        let smooth = w * v0.normal + u * v1.normal + v * v2.normal;
        let normal = if smooth.length_squared() > 0.0 {
            facing(smooth.normalize())
        } else {
            flat
        };

        Some(HitInfo {
            point: ray.at(t) + flat * SURFACE_OFFSET,
            normal,
            object: self,
            distance: t,
            uv,
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let bbox = Aabb::enclosing(self.vertices.iter().map(|v| v.position))?;
        // Pad flat dimensions so axis-aligned triangles still have volume
        let delta = Vec3::splat(1e-4);
        Some(Aabb::from_points(bbox.min - delta, bbox.max + delta))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_triangle() -> Triangle {
        Triangle::new(
            [
                Vertex::new(Vec3::new(-1.0, -1.0, -2.0)).with_uv(Vec2::new(0.0, 0.0)),
                Vertex::new(Vec3::new(1.0, -1.0, -2.0)).with_uv(Vec2::new(1.0, 0.0)),
                Vertex::new(Vec3::new(0.0, 1.0, -2.0)).with_uv(Vec2::new(0.5, 1.0)),
            ],
            Material::None,
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = tri.intersect(&ray).unwrap();

        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        // Offset toward the ray origin
        assert!(hit.point.z > -2.0);
        assert!(hit.uv.x >= 0.0 && hit.uv.x < 1.0);
        assert!(hit.uv.y >= 0.0 && hit.uv.y < 1.0);
    }

    #[test]
    fn test_triangle_back_side_normal_faces_ray() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z);
        let hit = tri.intersect(&ray).unwrap();

        assert!((hit.normal + Vec3::Z).length() < 1e-5);
        assert!(hit.point.z < -2.0);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = test_triangle();

        // Outside the edges
        assert!(tri.intersect(&Ray::new(Vec3::new(2.0, 2.0, 0.0), -Vec3::Z)).is_none());
        // Parallel to the plane
        assert!(tri.intersect(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
        // Behind the origin
        assert!(tri.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn test_triangle_interpolates_vertex_normals() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let tri = Triangle::new(
            [
                Vertex::new(Vec3::new(-1.0, -1.0, -2.0)).with_normal(n),
                Vertex::new(Vec3::new(1.0, -1.0, -2.0)).with_normal(n),
                Vertex::new(Vec3::new(0.0, 1.0, -2.0)).with_normal(n),
            ],
            Material::None,
        );
        let hit = tri.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();

        assert!((hit.normal - n).length() < 1e-5);
    }

    #[test]
    fn test_triangle_uv_wraps() {
        let tri = Triangle::new(
            [
                Vertex::new(Vec3::new(-1.0, -1.0, -2.0)).with_uv(Vec2::new(1.5, 2.25)),
                Vertex::new(Vec3::new(1.0, -1.0, -2.0)).with_uv(Vec2::new(1.5, 2.25)),
                Vertex::new(Vec3::new(0.0, 1.0, -2.0)).with_uv(Vec2::new(1.5, 2.25)),
            ],
            Material::None,
        );
        let hit = tri.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();

        assert!((hit.uv - Vec2::new(0.5, 0.25)).length() < 1e-5);
    }

    #[test]
    fn test_flat_triangle_box_is_padded() {
        let bbox = test_triangle().bounding_box().unwrap();
        assert!(bbox.size().z > 0.0);
    }
}
