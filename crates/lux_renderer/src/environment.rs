//! Environment lighting for rays that leave the scene.

use std::f32::consts::PI;
use std::sync::Arc;

use lux_core::RgbImage;
use lux_math::Vec3;

use crate::Color;

/// What a ray sees when it hits nothing.
#[derive(Clone, Debug)]
pub enum Environment {
    Uniform(Color),
    /// Equirectangular RGB image; row 0 is straight up.
    Image(Arc<RgbImage>),
}

impl Environment {
    /// Radiance along a direction. `direction` must be unit length.
    pub fn sample(&self, direction: Vec3) -> Color {
        match self {
            Environment::Uniform(color) => *color,
            Environment::Image(image) => {
                let u = direction.x.atan2(direction.z) / (2.0 * PI) + 0.5;
                let v = direction.y * 0.5 + 0.5;
                let x = u * image.width() as f32;
                let y = (1.0 - v) * image.height() as f32;
                let [r, g, b] = image.pixel_at(x, y);
                Color::new(r as f32, g as f32, b as f32) / 255.0
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Uniform(Color::ONE)
    }
}
