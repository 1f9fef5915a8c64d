//! Images, the software screen surface, and the resource cache.
//!
//! [`ResourceCache`] is an explicit object owned by the application and
//! passed to whatever needs to load images; there is no global instance.
//! Loading never fails hard: a missing or corrupt file yields a visible
//! placeholder and a warning so the frame loop keeps running.

mod cache;
mod canvas;
mod error;
mod image_handle;

pub use cache::{ResourceCache, normalize_path};
pub use canvas::Canvas;
pub use error::AssetError;
pub use image_handle::{ImageHandle, PLACEHOLDER_COLOR, PLACEHOLDER_SIZE};
