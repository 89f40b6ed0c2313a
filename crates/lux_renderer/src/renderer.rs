//! Render configuration, tone mapping and whole-frame rendering.
//!
//! Pixels are seeded individually from `(seed, x, y)`, so the single-threaded
//! reference, the rayon batch render and the threaded scheduler all produce
//! identical images for the same seed.

use std::path::Path;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{CameraPlacement, Color, Framebuffer, World};

/// Slowest presentation rate honored; lower targets are clamped to it.
const MIN_TARGET_FPS: f32 = 0.01;

/// Mapping from linear radiance to display values in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneMap {
    /// Clamp only.
    None,
    /// Square root (gamma 2).
    Gamma,
    /// `1 - 1 / (1 + k·c)`; never saturates.
    SoftClip { k: f32 },
}

impl ToneMap {
    pub fn apply(self, color: Color) -> Color {
        let c = color.max(Color::ZERO);
        match self {
            ToneMap::None => c,
            ToneMap::Gamma => Color::new(c.x.sqrt(), c.y.sqrt(), c.z.sqrt()),
            ToneMap::SoftClip { k } => Color::ONE - Color::ONE / (Color::ONE + k * c),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Render worker threads
    pub worker_count: usize,
    /// Presentation rate of the viewer
    pub target_fps: f32,
    /// Vertical extent of the image plane at distance 1
    pub field_of_view: f32,
    /// Antialiasing grid size; each pixel takes this many samples squared
    pub samples_per_pixel_axis: u32,
    /// Bounce budget for diffuse and metal surfaces
    pub max_bounces: u32,
    /// Thin-lens aperture radius; 0 disables depth of field
    pub lens_radius: f32,
    /// Distance to the plane of perfect focus
    pub focus_distance: f32,
    /// Darkening of metal surfaces facing away from `light_direction`, 0 to 1
    pub self_shadow_intensity: f32,
    /// Fixed light direction used by the metal self-shadow term
    pub light_direction: [f32; 3],
    /// Pixel stride of each worker's progressive pass
    pub spread_factor: usize,
    /// Multiplier on environment radiance
    pub sky_brightness: f32,
    pub tone_map: ToneMap,
    /// Base seed for per-pixel random streams
    pub seed: u64,
    pub camera: CameraPlacement,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            worker_count: num_cpus::get(),
            target_fps: 30.0,
            field_of_view: 1.5,
            samples_per_pixel_axis: 4,
            max_bounces: 3,
            lens_radius: 0.0,
            focus_distance: 10.0,
            self_shadow_intensity: 0.5,
            light_direction: [0.0, 0.707, -0.707],
            spread_factor: 16,
            sky_brightness: 1.0,
            tone_map: ToneMap::Gamma,
            seed: 0,
            camera: CameraPlacement::default(),
        }
    }
}

impl RenderConfig {
    /// Load a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RenderConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.width == 0 || self.height == 0 {
            return invalid("image size must be non-zero");
        }
        if self.worker_count == 0 {
            return invalid("worker_count must be at least 1");
        }
        if self.samples_per_pixel_axis == 0 {
            return invalid("samples_per_pixel_axis must be at least 1");
        }
        if self.spread_factor == 0 {
            return invalid("spread_factor must be at least 1");
        }
        if self.focus_distance <= 0.0 {
            return invalid("focus_distance must be positive");
        }
        if self.target_fps.is_nan() || self.target_fps <= 0.0 {
            return invalid("target_fps must be positive");
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Time between presentations at `target_fps`, never longer than
    /// `1 / MIN_TARGET_FPS`.
    pub fn frame_interval(&self) -> Duration {
        // f32::max drops NaN, so the division is always finite
        Duration::from_secs_f32(1.0 / self.target_fps.max(MIN_TARGET_FPS))
    }
}

/// Quantize a display color to 8 bits. Out-of-range and NaN channels
/// saturate (`as u8` clamps and maps NaN to 0).
#[inline]
pub fn quantize(color: Color) -> [u8; 3] {
    let c = color * 255.0;
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Random stream for one pixel.
#[inline]
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> SmallRng {
    let mixed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((y as u64) << 32 | x as u64);
    SmallRng::seed_from_u64(mixed)
}

/// Render the whole frame on the calling thread.
pub fn render_reference(world: &World) -> Framebuffer {
    let config = &world.config;
    let fb = Framebuffer::new(config.width, config.height);
    for y in 0..config.height {
        for x in 0..config.width {
            let index = y as usize * config.width as usize + x as usize;
            fb.store(index, world.render_pixel_seeded(x, y, config.seed));
        }
    }
    fb
}

/// Render the whole frame with rayon, one row per task.
pub fn render_parallel(world: &World) -> Framebuffer {
    let config = &world.config;
    let fb = Framebuffer::new(config.width, config.height);
    let start = std::time::Instant::now();

    (0..config.height).into_par_iter().for_each(|y| {
        for x in 0..config.width {
            let index = y as usize * config.width as usize + x as usize;
            fb.store(index, world.render_pixel_seeded(x, y, config.seed));
        }
    });

    log::info!(
        "Rendered {}x{} in {:.2?}",
        config.width,
        config.height,
        start.elapsed()
    );
    fb
}
