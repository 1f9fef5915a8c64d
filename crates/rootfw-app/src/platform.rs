//! The seam between the frame loop and a display/input backend.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use rootfw_assets::Canvas;
use rootfw_scene::Event;

use crate::error::AppError;

/// Source of input events and sink for finished frames.
pub trait Platform {
    /// Events that arrived since the last poll, in order.
    fn poll_events(&mut self) -> Vec<Event>;

    /// Show a finished frame.
    fn present(&mut self, _canvas: &Canvas) -> Result<(), AppError> {
        Ok(())
    }
}

/// Platform without a window: replays scripted events and asks to quit once
/// its frame budget is spent.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: BTreeMap<u64, Vec<Event>>,
    polls: u64,
    presented: u64,
    max_frames: Option<u64>,
}

impl HeadlessPlatform {
    /// `max_frames` of `None` runs until something else stops the loop.
    pub fn new(max_frames: Option<u64>) -> Self {
        Self {
            max_frames,
            ..Self::default()
        }
    }

    /// Deliver `event` on frame `frame` (0-based).
    pub fn with_event_at(mut self, frame: u64, event: Event) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    pub fn push_event_at(&mut self, frame: u64, event: Event) {
        self.script.entry(frame).or_default().push(event);
    }

    /// Frames shown so far.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<Event> {
        let frame = self.polls;
        self.polls += 1;

        let mut events = self.script.remove(&frame).unwrap_or_default();
        if self.max_frames.is_some_and(|max| frame + 1 >= max) {
            events.push(Event::Quit);
        }
        events
    }

    fn present(&mut self, _canvas: &Canvas) -> Result<(), AppError> {
        self.presented += 1;
        Ok(())
    }
}

/// Cloneable handle that asks a running [`App`](crate::App) to stop after
/// the current frame. A stop requested while the app is idle makes the next
/// run return before its first frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.requested.set(true);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.get()
    }

    pub(crate) fn reset(&self) {
        self.requested.set(false);
    }
}
