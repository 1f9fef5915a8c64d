//! 2D camera with smooth follow, anchored zoom, and world bounds.

use rootfw_assets::ImageHandle;
use rootfw_math::{Rect, Vec2, smooth_toward, smooth_toward_vec2};

use crate::arena::{EntityArena, EntityId};

/// Zoom never goes below this.
pub const MIN_ZOOM: f32 = 0.1;
/// Default smoothing rate; higher catches up faster.
pub const DEFAULT_SMOOTHNESS: f32 = 5.0;

/// Maps world rectangles to screen rectangles for one scene.
///
/// Position and zoom chase their targets at a frame-rate independent rate
/// (see [`rootfw_math::smoothing_factor`]). The follow target is held by
/// handle only; when the entity goes away the camera stops following it.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    target_position: Vec2,
    zoom: f32,
    target_zoom: f32,
    follow: Option<EntityId>,
    offset: Vec2,
    pub smoothness: f32,
    screen_size: Vec2,
    /// Infinite on an axis means no clamping on that axis.
    world_size: Vec2,
    manual: bool,
}

impl Camera {
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            target_position: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
            follow: None,
            offset: Vec2::ZERO,
            smoothness: DEFAULT_SMOOTHNESS,
            screen_size: Vec2::new(screen_width, screen_height),
            world_size: Vec2::INFINITY,
            manual: false,
        }
    }

    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_size = Vec2::new(width, height);
        self
    }

    pub fn with_smoothness(mut self, smoothness: f32) -> Self {
        self.smoothness = smoothness;
        self
    }

    /// Start at `zoom` with no easing.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        let zoom = zoom.max(MIN_ZOOM);
        self.zoom = zoom;
        self.target_zoom = zoom;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen_size = Vec2::new(width, height);
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    pub fn set_world_size(&mut self, width: f32, height: f32) {
        self.world_size = Vec2::new(width, height);
    }

    pub fn follow_target(&self) -> Option<EntityId> {
        self.follow
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Follow `target`, keeping its centre on screen centre plus `offset`.
    /// Leaves manual mode.
    pub fn follow(&mut self, target: EntityId, offset: Vec2) {
        self.follow = Some(target);
        self.offset = offset;
        self.manual = false;
    }

    /// Entering manual mode drops the follow target.
    pub fn set_manual_mode(&mut self, manual: bool) {
        self.manual = manual;
        if manual {
            self.follow = None;
        }
    }

    /// Aim at `position` (top-left of the view) in manual mode.
    pub fn set_target_position(&mut self, position: Vec2) {
        self.set_manual_mode(true);
        self.target_position = position;
    }

    /// Shift the target position by `delta` in manual mode.
    pub fn pan(&mut self, delta: Vec2) {
        self.set_manual_mode(true);
        self.target_position += delta;
    }

    /// Set the target zoom, clamped to [`MIN_ZOOM`].
    ///
    /// When following, the target position is recomputed for the new zoom
    /// right away so the followed entity stays the zoom anchor.
    pub fn set_zoom(&mut self, zoom: f32, arena: &EntityArena) {
        let zoom = zoom.max(MIN_ZOOM);
        if let Some(center) = self.follow.and_then(|id| arena.get(id)).map(|e| e.center()) {
            self.target_position = self.view_origin_for(center, zoom);
        }
        self.target_zoom = zoom;
    }

    /// Top-left of a view of `screen_size / zoom` centred on `center`.
    fn view_origin_for(&self, center: Vec2, zoom: f32) -> Vec2 {
        center - self.screen_size / (2.0 * zoom) + self.offset
    }

    /// Retarget on the followed entity, ease toward the targets, then clamp
    /// to the world bounds.
    pub fn update(&mut self, dt: f32, arena: &EntityArena) {
        if !self.manual
            && let Some(id) = self.follow
        {
            match arena.get(id) {
                Some(entity) => {
                    self.target_position = self.view_origin_for(entity.center(), self.target_zoom);
                }
                None => self.follow = None,
            }
        }

        self.position = smooth_toward_vec2(self.position, self.target_position, self.smoothness, dt);
        self.zoom = smooth_toward(self.zoom, self.target_zoom, self.smoothness, dt);
        self.clamp_to_world();
    }

    /// Jump straight to the targets without easing.
    pub fn snap_to_target(&mut self) {
        self.position = self.target_position;
        self.zoom = self.target_zoom;
        self.clamp_to_world();
    }

    fn clamp_to_world(&mut self) {
        let view = self.screen_size / self.zoom;
        if self.world_size.x.is_finite() {
            let max_x = (self.world_size.x - view.x).max(0.0);
            self.position.x = self.position.x.clamp(0.0, max_x);
        }
        if self.world_size.y.is_finite() {
            let max_y = (self.world_size.y - view.y).max(0.0);
            self.position.y = self.position.y.clamp(0.0, max_y);
        }
    }

    /// World rectangle currently on screen.
    pub fn visible_area(&self) -> Rect {
        let size = self.screen_size / self.zoom;
        Rect::new(self.position.x, self.position.y, size.x, size.y)
    }

    /// World rectangle to screen rectangle.
    pub fn apply(&self, rect: Rect) -> Rect {
        let origin = self.apply_point(rect.position());
        Rect::new(origin.x, origin.y, rect.w * self.zoom, rect.h * self.zoom)
    }

    /// World point to screen point.
    pub fn apply_point(&self, point: Vec2) -> Vec2 {
        (point - self.position) * self.zoom
    }

    /// Scale a whole image by the zoom. At zoom 1 the same image comes back.
    pub fn apply_surface(&self, image: &ImageHandle) -> ImageHandle {
        if self.zoom == 1.0 {
            return image.clone();
        }
        let width = (image.width() as f32 * self.zoom) as u32;
        let height = (image.height() as f32 * self.zoom) as u32;
        image.scaled(width, height)
    }
}
