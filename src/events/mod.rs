//! Status events and event sinks
//!
//! Everything observable about a column (elevators created, calls dispatched,
//! floors reached, doors cycling, sensor waits) is reported as a
//! [`StatusEvent`] handed to an injectable [`EventSink`].
//!
//! # Overview
//!
//! - **StatusEvent / EventKind**: timestamped, serializable event payloads
//! - **TracingSink**: structured `tracing` records
//! - **RecordingSink**: shared in-memory buffer for assertions
//! - **JsonLinesSink**: one JSON object per line to any writer
//! - **FanoutSink / NullSink**: composition and silence
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::events::*;
//! use elevator_column_simulator::types::*;
//! use chrono::Utc;
//!
//! let recorder = RecordingSink::new();
//! let mut sink = FanoutSink::new().with(recorder.clone()).with(TracingSink);
//!
//! sink.emit(StatusEvent::new(
//!     Utc::now(),
//!     ColumnId::new(1),
//!     EventKind::CallRegistered { floor: 3, direction: Direction::Up },
//! ));
//! assert_eq!(recorder.len(), 1);
//! ```

pub mod sink;
pub mod status_event;

// Re-export all public types for convenience
pub use sink::*;
pub use status_event::*;
