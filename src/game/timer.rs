use super::stats::types::Seconds;

/// Countdown measured in simulation ticks.
///
/// A timer is armed on creation and reports ready once `duration` calls to
/// [`TickTimer::update`] have happened. It stays ready until [`TickTimer::reset`];
/// it never re-arms by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    duration: u32,
    elapsed: u32,
}

impl TickTimer {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            elapsed: 0,
        }
    }

    /// Build from a duration in seconds at the given tick rate.
    pub fn from_secs(secs: Seconds, tps: f64) -> Self {
        Self::new(secs.to_ticks(tps))
    }

    /// A timer that starts out ready (weapon cooldowns).
    pub fn ready(duration: u32) -> Self {
        Self {
            duration,
            elapsed: duration,
        }
    }

    pub fn update(&mut self) {
        if self.elapsed < self.duration {
            self.elapsed += 1;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
