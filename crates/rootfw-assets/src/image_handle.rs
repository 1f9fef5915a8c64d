//! Shared, immutable RGBA images.

use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::error::AssetError;

/// Edge length of the fallback image used when loading fails.
pub const PLACEHOLDER_SIZE: u32 = 50;
/// Magenta, so a missing asset is obvious on screen.
pub const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 255, 255];

/// Cheaply clonable, immutable RGBA image.
///
/// Clones share pixel storage; operations that change pixels return a new
/// handle.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pixels: Arc<RgbaImage>,
}

impl ImageHandle {
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    /// Image of the given size filled with one colour.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// The fixed-size, fixed-colour fallback for failed loads.
    pub fn placeholder() -> Self {
        Self::solid(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR)
    }

    /// Decode an image file from disk.
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        let decoded = image::open(path).map_err(|source| AssetError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Colour of one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Returns a copy resized to exactly `width` x `height`. Returns a shared
    /// clone when the size already matches.
    pub fn scaled(&self, width: u32, height: u32) -> ImageHandle {
        if self.size() == (width, height) {
            return self.clone();
        }
        let width = width.max(1);
        let height = height.max(1);
        Self::from_image(image::imageops::resize(
            self.pixels.as_ref(),
            width,
            height,
            FilterType::Nearest,
        ))
    }

    /// True if both handles share the same pixel storage.
    pub fn ptr_eq(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
