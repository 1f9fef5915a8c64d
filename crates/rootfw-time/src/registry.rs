//! Name-keyed collection of timers driven by one clock.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::timer::Timer;

/// Owns every timer of an application, keyed by name.
///
/// Registering a timer under an existing name replaces the old one. Finished
/// timers are dropped on the next [`update`](Self::update) unless they were
/// built as reusable.
pub struct TimeRegistry {
    clock: Box<dyn Clock>,
    timers: BTreeMap<String, Timer>,
}

impl TimeRegistry {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            timers: BTreeMap::new(),
        }
    }

    /// Current time of the registry's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Register a timer without starting it.
    pub fn add_timer(&mut self, timer: Timer) {
        if self.timers.contains_key(timer.name()) {
            debug!(timer = timer.name(), "replacing existing timer");
        }
        self.timers.insert(timer.name().to_string(), timer);
    }

    /// Register a timer and start it at the current time.
    pub fn start_timer(&mut self, mut timer: Timer) {
        timer.start(self.now());
        self.add_timer(timer);
    }

    /// Restart a registered timer from the current time. Returns `false` if
    /// no timer has that name.
    pub fn restart(&mut self, name: &str) -> bool {
        let now = self.now();
        match self.timers.get_mut(name) {
            Some(timer) => {
                timer.start(now);
                true
            }
            None => false,
        }
    }

    /// Stop a registered timer. Returns `false` if no timer has that name.
    pub fn stop(&mut self, name: &str) -> bool {
        match self.timers.get_mut(name) {
            Some(timer) => {
                timer.stop();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Timer> {
        self.timers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Timer> {
        self.timers.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Timer> {
        self.timers.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance every timer, then drop finished timers that are not reusable.
    ///
    /// Returns the names of the timers that ended during this update.
    pub fn update(&mut self) -> Vec<String> {
        let now = self.now();
        let ended: Vec<String> = self
            .timers
            .values_mut()
            .filter_map(|timer| timer.update(now).then(|| timer.name().to_string()))
            .collect();

        self.timers.retain(|name, timer| {
            let keep = !timer.is_finished() || timer.is_reusable();
            if !keep {
                debug!(timer = name.as_str(), "dropping finished timer");
            }
            keep
        });
        ended
    }
}

impl Default for TimeRegistry {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}
