//! Countdown and looping timers, independent of entities.
//!
//! Timers are owned by an explicit [`TimeRegistry`] that the application
//! creates and updates once per frame. Time is read through a [`Clock`] so
//! tests can drive it by hand.

mod clock;
mod registry;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::TimeRegistry;
pub use timer::Timer;
