use std::path::PathBuf;

use lux_core::AssetError;
use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("primitive {index} has no bounding box and cannot be placed in a BVH")]
    UnboundedPrimitive { index: usize },

    #[error("cannot build a BVH over zero primitives")]
    EmptyHierarchy,

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Errors raised while loading or validating a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
