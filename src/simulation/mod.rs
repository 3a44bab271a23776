//! Simulation support around the column core
//!
//! # Overview
//!
//! - **SimulationClock**: simulated time advanced by travel, dwell and backoff
//! - **ElevatorError**: error type shared by every component
//! - **LoggingConfig**: tracing subscriber setup
//! - **Scenario** / **ScenarioOrchestrator**: scripted runs with expectations
//! - **ColumnService**: a column on its own thread behind a cloneable handle
//! - **RunStatistics**: counters folded from status events
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::events::NullSink;
//! use elevator_column_simulator::sensors::ClearSignal;
//! use elevator_column_simulator::simulation::*;
//! use elevator_column_simulator::types::*;
//!
//! let orchestrator = ScenarioOrchestrator::new(ColumnConfig::residential(10, 2))
//!     .with_signals(|_| Box::new(ClearSignal));
//!
//! for scenario in builtin_scenarios() {
//!     let report = orchestrator.run(&scenario, Box::new(NullSink)).unwrap();
//!     assert!(report.passed());
//! }
//! ```

pub mod clock;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod scenario;
pub mod service;
pub mod statistics;

// Re-export all public types for convenience
pub use clock::*;
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use scenario::*;
pub use service::*;
pub use statistics::*;
