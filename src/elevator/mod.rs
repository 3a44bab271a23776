//! Elevator cabs
//!
//! This module contains the per-cab state machine and the hardware it drives.
//!
//! # Overview
//!
//! - **Elevator**: stop queue and sweep-based motion engine
//! - **DoorController**: cab door plus mirrored landing doors with interlocks
//! - **DisplayPanel**: passive floor indicators
//! - **MotionContext**: the column collaborators lent to a cab while it moves
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::column::CallBoard;
//! use elevator_column_simulator::elevator::*;
//! use elevator_column_simulator::events::RecordingSink;
//! use elevator_column_simulator::sensors::ClearSignal;
//! use elevator_column_simulator::simulation::SimulationClock;
//! use elevator_column_simulator::types::*;
//!
//! let config = ColumnConfig::default();
//! let mut cab = Elevator::new(ElevatorId::new(1), &config, Box::new(ClearSignal));
//!
//! let mut calls = CallBoard::new(config.min_floor, config.max_floor);
//! let mut sink = RecordingSink::new();
//! let mut clock = SimulationClock::new();
//! let mut ctx = MotionContext::new(ColumnId::new(1), &mut calls, &mut sink, &mut clock);
//!
//! cab.request_floor(4, &mut ctx).unwrap();
//! assert_eq!(cab.floor(), 4);
//! assert_eq!(cab.status(), ElevatorStatus::Idle);
//! ```

pub mod display;
pub mod door;
pub mod motion;

pub use display::*;
pub use door::*;
pub use motion::*;
