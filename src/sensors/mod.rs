//! Weight and obstruction sensing
//!
//! Cab sensors are modelled as an opaque [`EnvironmentSignal`] turned into a
//! clear/blocked decision by [`SensorThresholds`], re-sampled under a bounded
//! [`RetryPolicy`] whose backoff runs on the simulated clock.
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::sensors::*;
//! use elevator_column_simulator::types::SensorKind;
//!
//! let thresholds = SensorThresholds::default();
//! let mut signal = ScriptedSignal::new().block_weight(2);
//! let policy = RetryPolicy::default();
//!
//! let waits = policy
//!     .run(|| thresholds.evaluate(SensorKind::Weight, signal.read(SensorKind::Weight)), |_, _, _| {})
//!     .unwrap();
//! assert_eq!(waits, 2);
//! ```

pub mod retry;
pub mod signal;

pub use retry::*;
pub use signal::*;
