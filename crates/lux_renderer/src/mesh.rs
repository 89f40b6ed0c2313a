//! Polygon mesh primitive: a triangle soup behind its own BVH.

use std::path::Path;

use crate::error::SceneError;
use crate::hittable::{HitInfo, Primitive};
use crate::{Bvh, Material, Triangle};
use lux_core::TriangleSoup;
use lux_math::{Aabb, Ray, Vec3};
use rand::RngCore;

/// A triangle mesh shaded with a single material.
///
/// Hits on any triangle report the mesh itself as the hit object, so the
/// mesh material applies.
pub struct PolygonMesh {
    triangles: Bvh,
    material: Material,
}

impl PolygonMesh {
    pub fn new(
        soup: TriangleSoup,
        material: Material,
        rng: &mut dyn RngCore,
    ) -> Result<Self, SceneError> {
        let triangles = soup
            .triangles
            .into_iter()
            .map(|vertices| Box::new(Triangle::new(vertices, Material::None)) as Box<dyn Primitive>)
            .collect();

        Ok(Self {
            triangles: Bvh::build(triangles, rng)?,
            material,
        })
    }

    /// Load an OBJ file and fit it into a box of edge `size` centered on `center`.
    pub fn load(
        path: impl AsRef<Path>,
        center: Vec3,
        size: f32,
        material: Material,
        rng: &mut dyn RngCore,
    ) -> Result<Self, SceneError> {
        let soup = lux_core::load_obj(path)?.normalized(center, size);
        Self::new(soup, material, rng)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Primitive for PolygonMesh {
    fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let hit = self.triangles.intersect(ray)?;
        Some(HitInfo { object: self, ..hit })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.triangles.bounding_box()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
