//! Headless presentation: framebuffer snapshots written as PNG files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use lux_renderer::{FrameScheduler, Framebuffer};

/// Copy a framebuffer into an image the `image` crate can encode.
pub fn to_image(fb: &Framebuffer) -> Option<RgbaImage> {
    RgbaImage::from_raw(fb.width(), fb.height(), fb.to_rgba_bytes())
}

fn write_png(fb: &Framebuffer, path: &Path) -> Result<()> {
    let image = to_image(fb).context("framebuffer size does not match its pixel data")?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

pub fn save_png(fb: &Framebuffer, path: &Path) -> Result<()> {
    write_png(fb, path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Stop the frame in flight and save what it has rendered so far. Workers
/// are joined first so the image is not written to while it is encoded.
pub fn save_frame(scheduler: &mut FrameScheduler, path: &Path) -> Result<()> {
    scheduler.stop();
    save_png(scheduler.framebuffer(), path)
}

/// `out.png` with suffix 3 becomes `out_3.png`.
pub fn numbered_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    base.with_file_name(format!("{stem}_{index}.{ext}"))
}

/// Receives every presented snapshot; keeps the latest one on disk when
/// asked.
pub struct Presenter {
    snapshot: Option<PathBuf>,
    presented: usize,
}

impl Presenter {
    pub fn new(snapshot: Option<PathBuf>) -> Self {
        Self {
            snapshot,
            presented: 0,
        }
    }

    pub fn present(&mut self, fb: &Framebuffer) -> Result<()> {
        self.presented += 1;
        match &self.snapshot {
            Some(path) => write_png(fb, path),
            None => Ok(()),
        }
    }

    pub fn presented(&self) -> usize {
        self.presented
    }
}
