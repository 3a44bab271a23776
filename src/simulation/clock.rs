//! Simulated time
//!
//! Door dwell, floor travel and sensor backoff never sleep; they advance this
//! clock instead, and every status event is stamped with its current reading.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::trace;

/// Monotonic simulated clock owned by a column
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Simulated instant the column came online
    start: DateTime<Utc>,
    /// Simulated time elapsed since `start`
    elapsed: Duration,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    /// Create a clock starting at the current wall-clock time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a clock starting at a fixed instant
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, elapsed: Duration::zero() }
    }

    /// Create a clock starting at the Unix epoch, for reproducible event streams
    pub fn from_epoch() -> Self {
        Self::starting_at(Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now))
    }

    /// Current simulated time
    pub fn now(&self) -> DateTime<Utc> {
        self.start + self.elapsed
    }

    /// Simulated time elapsed since the clock started
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Instant the clock started at
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Advance the clock; negative durations are ignored
    pub fn advance_by(&mut self, duration: Duration) {
        if duration > Duration::zero() {
            self.elapsed = self.elapsed + duration;
            trace!(advanced_ms = duration.num_milliseconds(), elapsed_ms = self.elapsed.num_milliseconds(), "Clock advanced");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_given_instant() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let clock = SimulationClock::starting_at(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.elapsed(), Duration::zero());
    }

    #[test]
    fn test_advance_by_accumulates() {
        let mut clock = SimulationClock::from_epoch();
        clock.advance_by(Duration::seconds(2));
        clock.advance_by(Duration::milliseconds(250));
        assert_eq!(clock.elapsed(), Duration::milliseconds(2_250));
        assert_eq!(clock.now(), clock.start() + Duration::milliseconds(2_250));
    }

    #[test]
    fn test_negative_advance_is_ignored() {
        let mut clock = SimulationClock::from_epoch();
        clock.advance_by(Duration::seconds(-5));
        assert_eq!(clock.elapsed(), Duration::zero());
    }
}
