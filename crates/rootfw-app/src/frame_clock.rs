//! Frame pacing and delta-time measurement for the main loop.
//!
//! One update per frame with a variable `dt`, paced to the configured frame
//! rate. Long stalls are clamped so a debugger pause or a slow frame cannot
//! push bodies through walls.

use std::time::{Duration, Instant};

use tracing::warn;

/// Longest frame time handed to the simulation, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Produces the `dt` of each frame.
#[derive(Debug)]
pub struct FrameClock {
    /// Minimum wall time per frame; zero disables pacing.
    frame_budget: Duration,
    previous: Instant,
    /// When set, every tick returns this instead of measuring.
    fixed_dt: Option<f32>,
    frame_count: u64,
}

impl FrameClock {
    /// Clock that sleeps to hold `target_fps`. Zero means run unpaced.
    pub fn new(target_fps: u32) -> Self {
        let frame_budget = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        };
        Self {
            frame_budget,
            previous: Instant::now(),
            fixed_dt: None,
            frame_count: 0,
        }
    }

    /// Clock that never sleeps and always reports `dt`. Deterministic, for
    /// headless runs and tests.
    pub fn fixed(dt: f32) -> Self {
        Self {
            frame_budget: Duration::ZERO,
            previous: Instant::now(),
            fixed_dt: Some(clamp_frame_time(dt)),
            frame_count: 0,
        }
    }

    /// Wait out the rest of the frame budget and return the seconds since
    /// the previous tick, clamped to [`MAX_FRAME_TIME`].
    pub fn tick(&mut self) -> f32 {
        self.frame_count += 1;
        if let Some(dt) = self.fixed_dt {
            return dt;
        }

        let elapsed = self.previous.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous).as_secs_f32();
        self.previous = now;

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
        }
        clamp_frame_time(frame_time)
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }
}

/// Clamp a measured frame time into `[0, MAX_FRAME_TIME]`.
pub fn clamp_frame_time(seconds: f32) -> f32 {
    seconds.clamp(0.0, MAX_FRAME_TIME)
}
