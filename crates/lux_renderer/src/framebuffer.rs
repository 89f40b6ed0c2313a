//! Shared output buffer written by render workers.
//!
//! Each pixel is one `AtomicU32`, so workers holding disjoint pixel ranges
//! can write through a shared reference while the presenter reads.

use std::sync::atomic::{AtomicU32, Ordering};

/// Bytes per pixel in the packed layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major framebuffer. Pixel `(x, y)` has index `y * width + x` and packs
/// its bytes as `[alpha, red, green, blue]`. A cleared pixel is all zero, so
/// alpha 0 marks a pixel not yet written this frame.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Box<[AtomicU32]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&self) {
        for p in self.pixels.iter() {
            p.store(0, Ordering::Relaxed);
        }
    }

    /// Write an opaque pixel by linear index.
    #[inline]
    pub fn store(&self, index: usize, rgb: [u8; 3]) {
        let packed = u32::from_be_bytes([255, rgb[0], rgb[1], rgb[2]]);
        self.pixels[index].store(packed, Ordering::Relaxed);
    }

    /// `[alpha, red, green, blue]` of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index].load(Ordering::Relaxed).to_be_bytes()
    }

    /// Snapshot in the native `[A, R, G, B]` byte order.
    pub fn to_argb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.load(Ordering::Relaxed).to_be_bytes())
            .collect()
    }

    /// Snapshot reordered to `[R, G, B, A]`, as image encoders expect.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| {
                let [a, r, g, b] = p.load(Ordering::Relaxed).to_be_bytes();
                [r, g, b, a]
            })
            .collect()
    }

    /// Count of pixels written since the last clear.
    pub fn written(&self) -> usize {
        self.pixels
            .iter()
            .filter(|p| p.load(Ordering::Relaxed) >> 24 != 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_read_back() {
        let fb = Framebuffer::new(4, 3);
        fb.store(2 * 4 + 1, [10, 20, 30]);

        assert_eq!(fb.pixel(1, 2), [255, 10, 20, 30]);
        assert_eq!(fb.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(fb.written(), 1);
    }

    #[test]
    fn test_byte_layouts() {
        let fb = Framebuffer::new(2, 1);
        fb.store(1, [1, 2, 3]);

        let argb = fb.to_argb_bytes();
        assert_eq!(argb.len(), 2 * BYTES_PER_PIXEL);
        assert_eq!(&argb[4..8], &[255, 1, 2, 3]);

        let rgba = fb.to_rgba_bytes();
        assert_eq!(&rgba[4..8], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_clear() {
        let fb = Framebuffer::new(2, 2);
        for i in 0..fb.len() {
            fb.store(i, [9, 9, 9]);
        }
        assert_eq!(fb.written(), 4);

        fb.clear();
        assert_eq!(fb.written(), 0);
        assert!(fb.to_argb_bytes().iter().all(|&b| b == 0));
    }
}
