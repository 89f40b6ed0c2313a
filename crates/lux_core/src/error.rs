use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading scene assets.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has {found} channels, expected 3 (RGB)")]
    ChannelCount { path: PathBuf, found: u8 },

    #[error("failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ {path} contains no triangles")]
    EmptyMesh { path: PathBuf },

    #[error("image buffer is {found} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;
