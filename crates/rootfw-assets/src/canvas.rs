//! Software RGBA surface that frames are drawn into.

use std::path::Path;

use image::{Rgba, RgbaImage};
use rootfw_math::Rect;

use crate::error::AssetError;
use crate::image_handle::ImageHandle;

/// Software screen surface that scenes draw into each frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Black, fully opaque canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
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

    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba(color);
        }
    }

    /// Fill the part of `rect` that lies on the canvas.
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels.put_pixel(x, y, Rgba(color));
            }
        }
    }

    /// Draw a one-pixel outline along the edges of `rect`.
    pub fn outline_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for x in x0..x1 {
            self.pixels.put_pixel(x, y0, Rgba(color));
            self.pixels.put_pixel(x, y1 - 1, Rgba(color));
        }
        for y in y0..y1 {
            self.pixels.put_pixel(x0, y, Rgba(color));
            self.pixels.put_pixel(x1 - 1, y, Rgba(color));
        }
    }

    /// Alpha-blend `image` with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, image: &ImageHandle, x: i64, y: i64) {
        image::imageops::overlay(&mut self.pixels, image.as_rgba(), x, y);
    }

    /// Blend `image` stretched to cover `dest`. Rectangles smaller than a
    /// pixel are skipped.
    pub fn blit_scaled(&mut self, image: &ImageHandle, dest: Rect) {
        let width = dest.w.round();
        let height = dest.h.round();
        if width < 1.0 || height < 1.0 {
            return;
        }
        let scaled = image.scaled(width as u32, height as u32);
        self.blit(&scaled, dest.x.round() as i64, dest.y.round() as i64);
    }

    /// Colour of one pixel, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Write the canvas to a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), AssetError> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| AssetError::Save {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Integer pixel bounds of `rect` intersected with the canvas.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.left().round().max(0.0);
        let y0 = rect.top().round().max(0.0);
        let x1 = rect.right().round().min(self.width() as f32);
        let y1 = rect.bottom().round().min(self.height() as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}
