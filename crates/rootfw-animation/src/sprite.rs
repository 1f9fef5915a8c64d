//! Named clips of frames and the timing that steps through them.

use std::collections::HashMap;
use std::path::Path;

use rootfw_assets::{ImageHandle, ResourceCache};
use tracing::{debug, warn};

/// Seconds each frame is shown when a clip has no duration of its own.
pub const DEFAULT_FRAME_DURATION: f32 = 0.1;

// ---------------------------------------------------------------------------
// Clip (internal)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Clip {
    /// All frames share the size of the first one.
    frames: Vec<ImageHandle>,
    /// Seconds per frame; `None` uses the sprite default.
    frame_duration: Option<f32>,
}

// ---------------------------------------------------------------------------
// AnimatedSprite
// ---------------------------------------------------------------------------

/// Named animation clips and the playback state of the current one.
///
/// Call [`AnimatedSprite::update`] once per frame. Playback can be frozen on a
/// chosen frame with [`AnimatedSprite::set_frame`] and picked up again with
/// [`AnimatedSprite::resume_animation`].
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    clips: HashMap<String, Clip>,
    current: Option<String>,
    frame: usize,
    /// +1 forward, -1 backward (ping-pong only).
    direction: i32,
    /// Time spent on the current frame.
    elapsed: f32,
    looping: bool,
    pingpong: bool,
    manual: bool,
    default_frame_duration: f32,
}

impl Default for AnimatedSprite {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedSprite {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            current: None,
            frame: 0,
            direction: 1,
            elapsed: 0.0,
            looping: true,
            pingpong: false,
            manual: false,
            default_frame_duration: DEFAULT_FRAME_DURATION,
        }
    }

    pub fn with_default_frame_duration(mut self, seconds: f32) -> Self {
        self.default_frame_duration = seconds;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_pingpong(mut self, pingpong: bool) -> Self {
        self.pingpong = pingpong;
        self
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_pingpong(&mut self, pingpong: bool) {
        self.pingpong = pingpong;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_pingpong(&self) -> bool {
        self.pingpong
    }

    /// True while a frame chosen with [`set_frame`](Self::set_frame) is held.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Register a clip from decoded frames.
    ///
    /// Every frame is resized to the first frame's size. An empty list is
    /// ignored. The first clip ever added becomes the current one.
    pub fn add_animation_from_images(
        &mut self,
        name: impl Into<String>,
        images: Vec<ImageHandle>,
        frame_duration: Option<f32>,
    ) {
        let name = name.into();
        let Some(first) = images.first() else {
            debug!(clip = %name, "ignoring clip without frames");
            return;
        };
        let (width, height) = first.size();
        let frames: Vec<ImageHandle> = images
            .iter()
            .map(|image| image.scaled(width, height))
            .collect();

        debug!(clip = %name, frames = frames.len(), "clip added");
        self.clips.insert(
            name.clone(),
            Clip {
                frames,
                frame_duration,
            },
        );
        if self.current.is_none() {
            self.current = Some(name);
            self.frame = 0;
        }
    }

    /// Register a clip by loading each path through `cache`.
    ///
    /// Frames that fail to load are skipped with a warning. Returns how many
    /// frames the clip ended up with.
    pub fn add_animation_from_paths<P: AsRef<Path>>(
        &mut self,
        name: impl Into<String>,
        paths: &[P],
        frame_duration: Option<f32>,
        cache: &mut ResourceCache,
    ) -> usize {
        let name = name.into();
        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            match cache.try_load_image(path) {
                Ok(image) => images.push(image),
                Err(err) => warn!(clip = %name, "{err}; frame skipped"),
            }
        }
        let count = images.len();
        self.add_animation_from_images(name, images, frame_duration);
        count
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Switch to the clip `name`.
    ///
    /// With `reset` playback restarts at frame 0 going forward; without it
    /// the frame index is kept, clamped to the new clip. Unknown names are
    /// logged and leave the sprite unchanged. Returns whether the clip exists.
    pub fn set_animation(&mut self, name: &str, reset: bool) -> bool {
        let Some(clip) = self.clips.get(name) else {
            warn!(clip = name, "animation not found");
            return false;
        };
        let len = clip.frames.len();
        self.current = Some(name.to_string());
        if reset {
            self.frame = 0;
            self.direction = 1;
            self.elapsed = 0.0;
        } else {
            self.frame = self.frame.min(len.saturating_sub(1));
        }
        true
    }

    /// Show frame `index` (clamped to the clip) and hold it until
    /// [`resume_animation`](Self::resume_animation).
    pub fn set_frame(&mut self, index: usize) {
        let len = self.frame_count();
        self.frame = index.min(len.saturating_sub(1));
        self.elapsed = 0.0;
        self.manual = true;
    }

    /// Continue timed playback from the held frame.
    pub fn resume_animation(&mut self) {
        self.manual = false;
    }

    /// Advance playback by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.manual {
            return;
        }
        let Some(clip) = self.current.as_deref().and_then(|name| self.clips.get(name)) else {
            return;
        };
        let len = clip.frames.len();
        let duration = clip.frame_duration.unwrap_or(self.default_frame_duration);
        if duration <= 0.0 {
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= duration {
            self.elapsed -= duration;
            self.advance(len);
        }
    }

    fn advance(&mut self, len: usize) {
        if len <= 1 {
            self.frame = 0;
            return;
        }
        let last = len as i64 - 1;
        let next = self.frame as i64 + i64::from(self.direction);

        let next = if self.pingpong {
            if next > last {
                self.direction = -1;
                last - 1
            } else if next < 0 {
                self.direction = 1;
                1
            } else {
                next
            }
        } else if next > last {
            if self.looping { 0 } else { last }
        } else {
            next.max(0)
        };
        self.frame = next as usize;
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// +1 while playing forward, -1 while a ping-pong clip plays backward.
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Number of frames in the current clip.
    pub fn frame_count(&self) -> usize {
        self.current_clip().map_or(0, |clip| clip.frames.len())
    }

    /// Image of the current frame.
    pub fn current_frame(&self) -> Option<&ImageHandle> {
        self.current_clip()?.frames.get(self.frame)
    }

    /// Pixel size shared by the frames of the current clip.
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.current_clip()?.frames.first().map(ImageHandle::size)
    }

    fn current_clip(&self) -> Option<&Clip> {
        self.clips.get(self.current.as_deref()?)
    }
}
