//! Elevator Column Simulator
//!
//! Dispatch and motion simulation for a column of elevators sharing one range
//! of floors.
//!
//! # Overview
//!
//! A column owns its cabs and the hall call buttons on every landing. When a
//! rider calls an elevator, the column picks a cab in three tiers (already
//! sweeping toward the call, then idle, then any moving cab), nearest first.
//! Each cab keeps a sorted stop queue and sweeps toward the furthest stop in
//! its direction, servicing every queued floor on the way before reversing or
//! going idle. Doors only close once the weight and obstruction sensors read
//! clear; blocked readings are retried with exponential backoff on a simulated
//! clock.
//!
//! ## Key Features
//!
//! - **Three-tier dispatch**: nearest reachable, idle or moving cab
//! - **Sweep motion**: sorted, duplicate-free stop queues per cab
//! - **Sensor interlocks**: bounded retry with backoff before doors close
//! - **Status events**: every state change delivered to a pluggable sink
//! - **Scenarios**: scripted runs with expected dispatch outcomes
//! - **Threaded service**: a column behind a cloneable channel handle
//!
//! ## Quick Start
//!
//! ```rust
//! use elevator_column_simulator::*;
//!
//! let sink = RecordingSink::new();
//! let mut column = Column::with_signals(
//!     ColumnConfig::residential(10, 2),
//!     Box::new(sink.clone()),
//!     |_| Box::new(ClearSignal),
//! )?;
//!
//! column.place_elevator(ElevatorId::new(1), 2, ElevatorStatus::Idle)?;
//! column.place_elevator(ElevatorId::new(2), 6, ElevatorStatus::Idle)?;
//!
//! let elevator = column.request_elevator(3, Direction::Up)?;
//! assert_eq!(elevator, ElevatorId::new(1));
//!
//! column.request_floor(elevator, 7)?;
//! let stats = RunStatistics::from_events(&sink.events());
//! println!("{}", stats.compact_summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, status enums and configuration
//! - [`sensors`]: Environment signals, thresholds and retry policy
//! - [`events`]: Status events and sinks
//! - [`elevator`]: Cab motion engine, doors and floor displays
//! - [`column`]: Columns, hall call boards and dispatching
//! - [`simulation`]: Clock, errors, logging, scenarios, service and statistics
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Column    │    │  Elevator   │    │   Sensors   │
//! │             │    │             │    │             │
//! │ Dispatcher  │───►│ Stop Queue  │───►│ Signals     │
//! │ Call Board  │    │ Doors       │    │ Retry       │
//! │             │    │ Displays    │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                  │
//!        ▼                  ▼
//! ┌─────────────┐    ┌─────────────┐
//! │   Events    │    │ Simulation  │
//! │             │    │             │
//! │ Sinks       │◄───┤ Clock       │
//! │ Status      │    │ Scenarios   │
//! └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod column;
pub mod elevator;
pub mod events;
pub mod sensors;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    // Enums
    ButtonStatus,
    // Configuration
    ColumnConfig,
    // Identifiers
    ColumnId,
    ColumnStatus,
    ConfigError,
    ConfigValidationError,
    Direction,
    DispatchTier,
    DisplayStatus,
    DoorStatus,
    ElevatorId,
    ElevatorStatus,
    EventId,
    Floor,
    SensorKind,
    SensorStatus,
};

// Column and dispatching
pub use column::{select_elevator, CallBoard, CallClearer, Column, Selection};

// Elevator cabs
pub use elevator::{DoorController, Elevator, ElevatorSnapshot, MotionContext};

// Sensors
pub use sensors::{
    ClearSignal, EnvironmentSignal, RandomSignal, RetryPolicy, ScriptedSignal, SensorThresholds,
};

// Status events
pub use events::{
    EventKind, EventSink, FanoutSink, JsonLinesSink, NullSink, RecordingSink, StatusEvent,
    TracingSink,
};

// Simulation support
pub use simulation::{
    builtin_scenarios, ColumnHandle, ColumnService, ElevatorError, ElevatorResult, LoggingConfig,
    RunStatistics, Scenario, ScenarioOrchestrator, ScenarioReport, SimulationClock,
};
