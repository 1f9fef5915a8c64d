//! Axis-aligned float rectangle.

use glam::Vec2;

/// Axis-aligned rectangle in floating-point screen/world units.
///
/// `x`/`y` is the top-left corner, `w`/`h` the size. The y axis points down,
/// so `bottom() > top()` for a rectangle with positive height.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle of the given size centred on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Move the rectangle so its left edge sits at `left`.
    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    /// Move the rectangle so its right edge sits at `right`.
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    /// Move the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    /// Move the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move the top-left corner to `(x, y)`, keeping the size.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Resize in place, keeping the top-left corner fixed.
    pub fn set_size(&mut self, w: f32, h: f32) {
        self.w = w;
        self.h = h;
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Move the rectangle so its centre sits at `(x, y)`, keeping the size.
    pub fn set_center(&mut self, x: f32, y: f32) {
        self.x = x - self.w / 2.0;
        self.y = y - self.h / 2.0;
    }

    /// Returns a copy shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Returns true if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Returns true if the point lies inside the rectangle. The right and
    /// bottom edges are exclusive.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Returns true if the two rectangles overlap with positive area.
    ///
    /// Rectangles that only share an edge do not intersect, and a rectangle
    /// with zero width or height never intersects anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Returns the smallest rectangle enclosing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}
