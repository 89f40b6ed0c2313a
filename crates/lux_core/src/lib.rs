//! Lux Core - asset loading for the Lux path tracer.
//!
//! This crate provides:
//!
//! - **Images**: `RgbImage`, an 8-bit RGB raster used for skyboxes and image textures
//! - **Meshes**: `TriangleSoup`, a flat triangle list loaded from OBJ files
//!
//! Both loaders return `AssetError` with the offending path on failure.
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{load_obj, load_rgb_image};
//!
//! let sky = load_rgb_image("assets/sky.jpg")?;
//! let bunny = load_obj("assets/bunny.obj")?;
//! println!("{}x{} sky, {} triangles", sky.width(), sky.height(), bunny.len());
//! ```

pub mod error;
pub mod raster;
pub mod mesh;

pub use error::{AssetError, AssetResult};
pub use raster::{load_rgb_image, RgbImage};
pub use mesh::{load_obj, TriangleSoup, Vertex};
