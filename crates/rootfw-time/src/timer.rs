//! A single named timer with optional looping and an end callback.

use std::fmt;
use std::time::Duration;

type EndCallback = Box<dyn FnMut()>;

/// A named countdown that can loop and fire a callback when it runs out.
///
/// Timers do not read the clock themselves: every call that depends on time
/// takes the current `now` so the owning [`TimeRegistry`](crate::TimeRegistry)
/// decides where time comes from.
pub struct Timer {
    name: String,
    duration: Duration,
    looping: bool,
    reusable: bool,
    on_end: Option<EndCallback>,
    start_time: Option<Duration>,
    stopped: bool,
    progress: f32,
}

impl Timer {
    /// A one-shot, non-reusable timer that has not been started.
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
            looping: false,
            reusable: false,
            on_end: None,
            start_time: None,
            stopped: true,
            progress: 0.0,
        }
    }

    /// Restart automatically on the update after the timer ends.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Keep the timer registered after it finishes so it can be restarted.
    pub fn reusable(mut self, reusable: bool) -> Self {
        self.reusable = reusable;
        self
    }

    /// Callback invoked each time the timer ends.
    pub fn on_end(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_reusable(&self) -> bool {
        self.reusable
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// (Re)start counting from `now`.
    pub fn start(&mut self, now: Duration) {
        self.start_time = Some(now);
        self.stopped = false;
        self.progress = 0.0;
    }

    /// Advance the timer to `now`. Returns `true` on the update where it ends.
    pub fn update(&mut self, now: Duration) -> bool {
        if self.stopped {
            return false;
        }
        let Some(start) = self.start_time else {
            return false;
        };

        if self.progress < 1.0 {
            self.progress = if self.duration.is_zero() {
                1.0
            } else {
                now.saturating_sub(start).as_secs_f32() / self.duration.as_secs_f32()
            };
            if self.progress >= 1.0 {
                self.end();
                return true;
            }
        } else if self.looping {
            self.start(now);
        }
        false
    }

    /// Pause the timer where it is.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Force the timer to its end state and fire the callback.
    pub fn end(&mut self) {
        self.progress = 1.0;
        if !self.looping {
            self.stopped = true;
        }
        if let Some(callback) = self.on_end.as_mut() {
            callback();
        }
    }

    /// A started, non-looping timer whose time has run out.
    pub fn is_finished(&self) -> bool {
        self.start_time.is_some() && !self.looping && self.progress >= 1.0
    }

    /// Completion fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress.min(1.0)
    }

    /// Time left before the timer ends.
    pub fn remaining(&self) -> Duration {
        if self.is_finished() {
            return Duration::ZERO;
        }
        self.duration
            .saturating_sub(self.duration.mul_f32(self.progress().max(0.0)))
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .field("looping", &self.looping)
            .field("reusable", &self.reusable)
            .field("has_callback", &self.on_end.is_some())
            .field("start_time", &self.start_time)
            .field("stopped", &self.stopped)
            .field("progress", &self.progress)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_new_timer_is_stopped_and_unstarted() {
        let mut timer = Timer::new("t", ms(100));
        assert!(timer.is_stopped());
        assert!(!timer.has_started());
        assert!(!timer.update(ms(500)));
        assert!(!timer.is_finished());
    }

    #[test]
    fn test_progress_and_remaining() {
        let mut timer = Timer::new("t", ms(1000));
        timer.start(ms(0));
        assert!(!timer.update(ms(250)));
        assert!((timer.progress() - 0.25).abs() < 1e-6);
        assert_eq!(timer.remaining(), ms(750));
    }

    #[test]
    fn test_one_shot_ends_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut timer = Timer::new("t", ms(100)).on_end(move || counter.set(counter.get() + 1));
        timer.start(ms(0));

        assert!(timer.update(ms(100)));
        assert!(timer.is_finished());
        assert!(timer.is_stopped());
        assert!(!timer.update(ms(300)));
        assert_eq!(fired.get(), 1);
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn test_looping_restarts_after_end() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut timer = Timer::new("loop", ms(100))
            .looping(true)
            .on_end(move || counter.set(counter.get() + 1));
        timer.start(ms(0));

        assert!(timer.update(ms(100)));
        assert!(!timer.is_finished());
        // The update after the end restarts from the current time.
        assert!(!timer.update(ms(120)));
        assert_eq!(timer.progress(), 0.0);
        assert!(timer.update(ms(220)));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_stop_freezes_progress() {
        let mut timer = Timer::new("t", ms(100));
        timer.start(ms(0));
        timer.update(ms(50));
        timer.stop();
        assert!(!timer.update(ms(500)));
        assert!((timer.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_ends_immediately() {
        let mut timer = Timer::new("t", Duration::ZERO);
        timer.start(ms(10));
        assert!(timer.update(ms(10)));
        assert!(timer.is_finished());
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut timer = Timer::new("t", ms(100)).reusable(true);
        timer.start(ms(0));
        timer.update(ms(100));
        assert!(timer.is_finished());
        timer.start(ms(200));
        assert!(!timer.is_finished());
        assert!(!timer.update(ms(250)));
        assert!((timer.progress() - 0.5).abs() < 1e-6);
    }
}
