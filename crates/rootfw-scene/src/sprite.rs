//! Static image capability for entities.

use std::path::Path;

use rootfw_assets::{ImageHandle, ResourceCache};

/// A single still image drawn at the entity's rectangle.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: ImageHandle,
}

impl Sprite {
    pub fn new(image: ImageHandle) -> Self {
        Self { image }
    }

    /// Load through the cache. A missing or broken file gives the magenta
    /// placeholder.
    pub fn load(cache: &mut ResourceCache, path: impl AsRef<Path>) -> Self {
        Self::new(cache.load_image(path))
    }

    /// Flat-coloured rectangle, handy for blocks and debug shapes.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(ImageHandle::solid(width, height, color))
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn set_image(&mut self, image: ImageHandle) {
        self.image = image;
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.size()
    }
}
