use std::time::{Duration, Instant};

use hashbrown::HashMap;
use itertools::Itertools;

/// Named wall clock timers.
///
/// A timer is started with [TimerManager::start] and its duration is recorded once [TimerManager::end] is called with the same name.
/// Ending a timer that was never started records nothing.
#[derive(Debug, Default)]
pub struct TimerManager {
    current_timers: HashMap<&'static str, Instant>,
    finished_timers: HashMap<&'static str, Duration>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, name: &'static str) {
        self.current_timers.insert(name, Instant::now());
    }

    pub fn end(&mut self, name: &'static str) -> Option<Duration> {
        let start = self.current_timers.remove(name)?;
        let duration = start.elapsed();
        self.finished_timers.insert(name, duration);

        Some(duration)
    }

    pub fn get(&self, name: &str) -> Option<Duration> {
        self.finished_timers.get(name).copied()
    }

    /// All finished timers, sorted by name
    pub fn get_all(&self) -> Vec<(&'static str, Duration)> {
        self.finished_timers
            .iter()
            .map(|(name, duration)| (*name, *duration))
            .sorted_by_key(|(name, _)| *name)
            .collect_vec()
    }

    pub fn clear(&mut self) {
        self.finished_timers.clear();
    }
}
