//! Drop timer state machine
//!
//! The scheduler only does the arithmetic: which phase the session is in
//! and how long until the next tick. Owning the actual timer is the job
//! of [`crate::runner`], or of whoever calls [`crate::game::Game::tick`].

use crate::settings::TimingSettings;
use std::time::Duration;
use tracing::debug;

/// Where the session is in the spawn/fall cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No active piece; the next tick spawns one
    Spawning,
    /// A piece is falling; the next tick moves it down or locks it
    Falling,
    /// Spawn failed; ticking has stopped
    Lost,
}

/// Tick interval bookkeeping with a speed ramp on every spawn
#[derive(Debug, Clone)]
pub struct DropScheduler {
    timing: TimingSettings,
    interval: Duration,
    running: bool,
}

impl DropScheduler {
    pub fn new(timing: TimingSettings) -> Self {
        Self {
            interval: timing.initial_interval(),
            timing,
            running: false,
        }
    }

    /// Current delay between ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Back to the initial interval and running
    pub fn start(&mut self) {
        self.interval = self.timing.initial_interval();
        self.running = true;
    }

    /// Stop ticking; the interval is kept
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Speed up after a spawn: `max(min, interval - step)`
    pub fn ramp(&mut self) -> Duration {
        let next = self
            .interval
            .saturating_sub(self.timing.interval_step())
            .max(self.timing.min_interval());
        if next != self.interval {
            debug!(from = ?self.interval, to = ?next, "drop interval ramped");
        }
        self.interval = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_starts_at_initial_interval() {
        let mut scheduler = DropScheduler::new(TimingSettings::default());
        assert!(!scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());
        assert_eq!(scheduler.interval(), ms(800));
    }

    #[test]
    fn test_ramp_steps_by_twenty_to_floor() {
        let mut scheduler = DropScheduler::new(TimingSettings::default());
        scheduler.start();

        let mut expected = 800;
        for _ in 0..100 {
            let next = scheduler.ramp();
            expected = (expected - 20).max(250);
            assert_eq!(next, ms(expected));
            assert!(next >= ms(250));
        }
        assert_eq!(scheduler.interval(), ms(250));
    }

    #[test]
    fn test_floor_reached_exactly() {
        // 800 - 20 * 27 = 260, then 250
        let mut scheduler = DropScheduler::new(TimingSettings::default());
        scheduler.start();
        for _ in 0..27 {
            scheduler.ramp();
        }
        assert_eq!(scheduler.interval(), ms(260));
        assert_eq!(scheduler.ramp(), ms(250));
        assert_eq!(scheduler.ramp(), ms(250));
    }

    #[test]
    fn test_step_larger_than_gap_clamps() {
        let timing = TimingSettings {
            initial_interval_ms: 300,
            interval_step_ms: 100,
            min_interval_ms: 250,
        };
        let mut scheduler = DropScheduler::new(timing);
        scheduler.start();
        assert_eq!(scheduler.ramp(), ms(250));
    }

    #[test]
    fn test_restart_resets_interval() {
        let mut scheduler = DropScheduler::new(TimingSettings::default());
        scheduler.start();
        scheduler.ramp();
        scheduler.ramp();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.interval(), ms(760));
        scheduler.start();
        assert_eq!(scheduler.interval(), ms(800));
    }
}
