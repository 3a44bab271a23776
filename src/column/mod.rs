//! Columns, call boards and dispatching
//!
//! # Overview
//!
//! - **Column**: owner of a bank of elevators and its hall call boards
//! - **CallBoard**: up and down hall call buttons
//! - **Dispatcher**: three-tier nearest-elevator selection
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::column::*;
//! use elevator_column_simulator::events::RecordingSink;
//! use elevator_column_simulator::sensors::ClearSignal;
//! use elevator_column_simulator::types::*;
//!
//! let sink = RecordingSink::new();
//! let mut column = Column::with_signals(
//!     ColumnConfig::residential(10, 2),
//!     Box::new(sink.clone()),
//!     |_| Box::new(ClearSignal),
//! )
//! .unwrap();
//!
//! let elevator = column.request_elevator(5, Direction::Down).unwrap();
//! column.request_floor(elevator, 1).unwrap();
//! assert_eq!(column.elevator(elevator).unwrap().floor(), 1);
//! ```

#[allow(clippy::module_inception)]
pub mod column;
pub mod call_board;
pub mod dispatcher;

pub use call_board::*;
pub use column::*;
pub use dispatcher::*;
