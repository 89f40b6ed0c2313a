//! Triangle soups loaded from OBJ files.
//!
//! A soup is a flat list of triangles with per-vertex attributes. There is no
//! shared index buffer: the renderer builds one primitive per triangle.

use std::path::Path;

use lux_math::{Aabb, Vec2, Vec3};

use crate::error::{AssetError, AssetResult};

/// A triangle corner with its attributes.
///
/// A zero `normal` means the source had no vertex normals; consumers fall back
/// to the face normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
        }
    }

    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }
}

/// A list of independent triangles.
#[derive(Clone, Debug, Default)]
pub struct TriangleSoup {
    pub triangles: Vec<[Vertex; 3]>,
}

impl TriangleSoup {
    pub fn new(triangles: Vec<[Vertex; 3]>) -> Self {
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounding box of every vertex position, `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::enclosing(self.triangles.iter().flatten().map(|v| v.position))
    }

    /// Uniformly scale and translate the soup so its largest extent equals
    /// `size` and its box is centered on `center`.
    ///
    /// Normals are unaffected by a uniform scale, so only positions change.
    pub fn normalized(mut self, center: Vec3, size: f32) -> Self {
        let Some(bounds) = self.bounds() else {
            return self;
        };
        let extent = bounds.size().max_element();
        let scale = if extent > 0.0 { size / extent } else { 1.0 };
        let old_center = bounds.center();

        for vertex in self.triangles.iter_mut().flatten() {
            vertex.position = (vertex.position - old_center) * scale + center;
        }
        self
    }
}

/// Load every model of an OBJ file as one triangle soup.
///
/// Faces are triangulated on load. Normals and texture coordinates are copied
/// when the file has them. Faces referencing out-of-range attributes are
/// skipped with a warning.
pub fn load_obj(path: impl AsRef<Path>) -> AssetResult<TriangleSoup> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut triangles = Vec::new();
    let mut skipped = 0usize;

    for model in &models {
        let mesh = &model.mesh;
        for face in mesh.indices.chunks_exact(3) {
            match face_vertices(mesh, face) {
                Some(tri) => triangles.push(tri),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} malformed faces in {}",
            skipped,
            path.display()
        );
    }

    if triangles.is_empty() {
        return Err(AssetError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "Loaded OBJ: {} ({} models, {} triangles)",
        path.display(),
        models.len(),
        triangles.len()
    );

    Ok(TriangleSoup::new(triangles))
}

fn face_vertices(mesh: &tobj::Mesh, face: &[u32]) -> Option<[Vertex; 3]> {
    let mut out = [Vertex::new(Vec3::ZERO); 3];
    for (slot, &index) in out.iter_mut().zip(face) {
        let i = index as usize;
        let position = mesh.positions.get(i * 3..i * 3 + 3)?;
        slot.position = Vec3::from_slice(position);

        if !mesh.normals.is_empty() {
            slot.normal = Vec3::from_slice(mesh.normals.get(i * 3..i * 3 + 3)?);
        }
        if !mesh.texcoords.is_empty() {
            slot.uv = Vec2::from_slice(mesh.texcoords.get(i * 2..i * 2 + 2)?);
        }
    }
    Some(out)
}
