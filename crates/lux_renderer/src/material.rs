//! Materials for path tracing.
//!
//! The material set is closed: shading in `World::ray_color` matches on the
//! variant directly.

use crate::Texture;
use lux_math::Vec3;

/// Color type (RGB, linear space).
pub type Color = Vec3;

#[derive(Clone, Debug, Default)]
pub enum Material {
    /// Unassigned; shades black.
    #[default]
    None,
    /// Scatters in a random direction around the normal, losing half its energy.
    Diffuse { texture: Texture },
    /// Mirror reflection. `reflectiveness` blends between the recursed color
    /// (1.0) and the plain texture color (0.0).
    Metal { texture: Texture, reflectiveness: f32 },
    /// Emits a fixed color and ends the path.
    DiffuseLight { emission: Color },
}

impl Material {
    pub fn diffuse(texture: impl Into<Texture>) -> Self {
        Material::Diffuse {
            texture: texture.into(),
        }
    }

    pub fn metal(texture: impl Into<Texture>, reflectiveness: f32) -> Self {
        Material::Metal {
            texture: texture.into(),
            reflectiveness: reflectiveness.clamp(0.0, 1.0),
        }
    }

    pub fn light(emission: Color) -> Self {
        Material::DiffuseLight { emission }
    }
}

/// Shared material for primitives that never shade a hit themselves.
pub(crate) static NO_MATERIAL: Material = Material::None;
