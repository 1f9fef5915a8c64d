//! Asset error types.

use std::path::PathBuf;

/// Errors surfaced by asset operations that are not recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Decoding or reading an image failed.
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing an image failed.
    #[error("failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Walking a resource directory failed.
    #[error("failed to read resource directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
