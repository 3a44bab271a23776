//! Core types and identifiers for the elevator column simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: numbered column and elevator ids, UUID-based event ids
//! - **Enums**: directions, motion status, door/button/sensor states, dispatch tiers
//! - **Configuration**: column configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use elevator_column_simulator::types::*;
//!
//! let config = ColumnConfig {
//!     max_floor: 20,
//!     elevator_count: 3,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//!
//! let direction: Direction = "up".parse().unwrap();
//! assert_eq!(ElevatorStatus::from(direction), ElevatorStatus::MovingUp);
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
