//! 8-bit RGB rasters for skyboxes and image textures.
//!
//! Images are kept as raw bytes; the renderer does its own nearest-pixel
//! lookup and scaling to [0, 1].

use std::path::Path;

use crate::error::{AssetError, AssetResult};

/// A decoded RGB image, row-major, 3 bytes per pixel, row 0 at the top.
#[derive(Clone, Debug)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    /// Wrap raw RGB bytes. The buffer length must be `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> AssetResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected || expected == 0 {
            return Err(AssetError::BufferSize {
                width,
                height,
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at integer coordinates, clamped to the image bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Nearest pixel for fractional coordinates. Coordinates are truncated
    /// toward zero and clamped, so negative or oversized values land on the
    /// border.
    #[inline]
    pub fn pixel_at(&self, x: f32, y: f32) -> [u8; 3] {
        // `as u32` saturates: negatives and NaN become 0
        self.pixel(x as u32, y as u32)
    }
}

/// Load an RGB image from disk.
///
/// Sources with any channel count other than 3 (grayscale, RGBA) are rejected
/// rather than converted.
pub fn load_rgb_image(path: impl AsRef<Path>) -> AssetResult<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let channels = img.color().channel_count();
    if channels != 3 {
        return Err(AssetError::ChannelCount {
            path: path.to_path_buf(),
            found: channels,
        });
    }

    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

    RgbImage::from_raw(width, height, rgb.into_raw())
}
