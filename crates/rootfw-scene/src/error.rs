//! Scene management error types.

use thiserror::Error;

/// Errors from scene lookups and scene list changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene '{0}' not found")]
    SceneNotFound(String),

    #[error("scene index {index} out of range (have {len} scenes)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("a scene named '{0}' already exists")]
    DuplicateScene(String),

    #[error("no scenes loaded")]
    NoScenes,

    #[error("cannot remove '{0}': it is the only scene")]
    LastScene(String),
}
