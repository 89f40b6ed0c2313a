//! Surface textures. Every texture is a pure function of the hit's texture
//! coordinate and world position.

use std::sync::Arc;

use lux_core::RgbImage;
use lux_math::{Vec2, Vec3};

use crate::Color;

/// Default frequency of the checker pattern.
pub const CHECKER_SCALE: f32 = 5.0;

#[derive(Clone, Debug)]
pub enum Texture {
    Solid(Color),
    /// 3D checker: `odd` where `sin(sx)·sin(sy)·sin(sz) < 0`, else `even`.
    Checker { even: Color, odd: Color, scale: f32 },
    /// Nearest-pixel lookup into an RGB raster.
    Image(Arc<RgbImage>),
    /// Shows the texture coordinate as `(u, v, 0)`.
    UvDebug,
}

impl Texture {
    pub fn solid(r: f32, g: f32, b: f32) -> Self {
        Texture::Solid(Color::new(r, g, b))
    }

    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker {
            even,
            odd,
            scale: CHECKER_SCALE,
        }
    }

    pub fn sample(&self, uv: Vec2, point: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd, scale } => {
                let s = *scale * point;
                let sines = s.x.sin() * s.y.sin() * s.z.sin();
                if sines < 0.0 {
                    *odd
                } else {
                    *even
                }
            }
            Texture::Image(image) => {
                let x = uv.x * image.width() as f32;
                let y = (1.0 - uv.y) * image.height() as f32;
                let [r, g, b] = image.pixel_at(x, y);
                Color::new(r as f32, g as f32, b as f32) / 255.0
            }
            Texture::UvDebug => Color::new(uv.x, uv.y, 0.0),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}
