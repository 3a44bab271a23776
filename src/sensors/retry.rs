//! Bounded retry with exponential backoff for sensor waits

use super::Reading;
use crate::types::defaults;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// How long and how often a blocked sensor is re-sampled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Re-samples allowed after the first blocked sample
    pub max_retries: u32,
    /// Backoff before the first re-sample, in milliseconds
    pub initial_backoff_ms: u64,
    /// Growth factor applied to each following backoff
    pub multiplier: f64,
    /// Backoff ceiling, in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::SENSOR_MAX_RETRIES,
            initial_backoff_ms: defaults::SENSOR_BACKOFF_MS,
            multiplier: defaults::SENSOR_BACKOFF_MULTIPLIER,
            max_backoff_ms: defaults::SENSOR_MAX_BACKOFF_MS,
        }
    }
}

/// Every allowed sample came back blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryExhausted {
    /// Samples taken, all blocked
    pub attempts: u32,
    /// The last blocked reading
    pub last: Reading,
}

impl RetryPolicy {
    /// Total samples allowed, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff to wait after the given blocked attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = (self.initial_backoff_ms as f64) * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_backoff_ms as f64).max(0.0);
        Duration::milliseconds(capped.round() as i64)
    }

    /// Sample until clear or out of attempts
    ///
    /// `on_blocked` sees every blocked sample with its 1-based attempt number and
    /// the backoff to wait before the next sample, or `None` when giving up.
    /// Returns the number of blocked samples seen before the clear one.
    pub fn run<S, B>(&self, mut sample: S, mut on_blocked: B) -> Result<u32, RetryExhausted>
    where
        S: FnMut() -> Reading,
        B: FnMut(u32, &Reading, Option<Duration>),
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let reading = sample();
            if reading.is_clear() {
                return Ok(attempt - 1);
            }

            if attempt >= max_attempts {
                on_blocked(attempt, &reading, None);
                return Err(RetryExhausted { attempts: attempt, last: reading });
            }
            on_blocked(attempt, &reading, Some(self.backoff(attempt)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorThresholds;
    use crate::types::SensorKind;

    fn reading(value: u32) -> Reading {
        SensorThresholds::default().evaluate(SensorKind::Weight, value)
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::milliseconds(250));
        assert_eq!(policy.backoff(2), Duration::milliseconds(500));
        assert_eq!(policy.backoff(3), Duration::milliseconds(1_000));
        assert_eq!(policy.backoff(5), Duration::milliseconds(4_000));
        assert_eq!(policy.backoff(30), Duration::milliseconds(4_000));
    }

    #[test]
    fn test_run_clear_first_time() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let result = policy.run(|| reading(100), |_, _, _| calls += 1);
        assert_eq!(result, Ok(0));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_run_counts_blocked_samples() {
        let policy = RetryPolicy::default();
        let mut values = vec![700, 650, 300].into_iter();
        let mut seen = Vec::new();

        let result = policy.run(
            || reading(values.next().unwrap_or(0)),
            |attempt, reading, backoff| seen.push((attempt, reading.value, backoff)),
        );

        assert_eq!(result, Ok(2));
        assert_eq!(
            seen,
            vec![
                (1, 700, Some(Duration::milliseconds(250))),
                (2, 650, Some(Duration::milliseconds(500))),
            ]
        );
    }

    #[test]
    fn test_run_gives_up_after_max_retries() {
        let policy = RetryPolicy { max_retries: 2, ..Default::default() };
        let mut backoffs = Vec::new();

        let result = policy.run(|| reading(900), |_, _, backoff| backoffs.push(backoff));

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last.value, 900);
        assert_eq!(backoffs.len(), 3);
        assert_eq!(backoffs.last(), Some(&None));
    }

    #[test]
    fn test_zero_retries_allows_single_sample() {
        let policy = RetryPolicy { max_retries: 0, ..Default::default() };
        assert_eq!(policy.max_attempts(), 1);
        let result = policy.run(|| reading(900), |_, _, _| {});
        assert_eq!(result.unwrap_err().attempts, 1);
    }
}
