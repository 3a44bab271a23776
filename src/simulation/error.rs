//! Error types and handling
//!
//! This module contains the error type shared by the column, its elevators,
//! the sensor interlocks, and the scenario runner.

use crate::types::{ColumnId, ConfigError, ConfigValidationError, ElevatorId, Floor, SensorKind};
use thiserror::Error;

/// Errors that can occur while operating or simulating a column
#[derive(Debug, Error)]
pub enum ElevatorError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// A floor outside the served range was requested
    #[error("Floor {floor} is out of range [{min_floor}, {max_floor}]")]
    OutOfRangeError {
        /// The rejected floor
        floor: Floor,
        /// Lowest floor accepted by the rejecting component
        min_floor: Floor,
        /// Highest floor accepted by the rejecting component
        max_floor: Floor,
    },

    /// A sensor stayed blocked for every allowed sample
    #[error("{sensor} sensor on {elevator} still blocked after {attempts} samples")]
    SensorStuckError {
        /// Elevator whose sensor is stuck
        elevator: ElevatorId,
        /// Which sensor stayed blocked
        sensor: SensorKind,
        /// Number of samples taken
        attempts: u32,
    },

    /// The dispatcher could not select an elevator
    #[error("Dispatch failed: {0}")]
    DispatchError(String),

    /// A door operation violated the motion interlock
    #[error("Door interlock violated: {0}")]
    DoorInterlockError(String),

    /// An elevator id does not belong to the column
    #[error("Unknown elevator: {0}")]
    UnknownElevatorError(ElevatorId),

    /// The column is out of service
    #[error("Column {0} is inactive")]
    ColumnInactiveError(ColumnId),

    /// The column service thread is gone
    #[error("Column service unavailable: {0}")]
    ServiceUnavailableError(String),

    /// A scenario could not be loaded or executed
    #[error("Scenario error: {0}")]
    ScenarioError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for ElevatorError {
    fn from(error: ConfigValidationError) -> Self {
        ElevatorError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigError> for ElevatorError {
    fn from(error: ConfigError) -> Self {
        ElevatorError::ConfigurationError(error.to_string())
    }
}

impl ElevatorError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create an out-of-range error
    pub fn out_of_range(floor: Floor, min_floor: Floor, max_floor: Floor) -> Self {
        Self::OutOfRangeError { floor, min_floor, max_floor }
    }

    /// Create a dispatch error
    pub fn dispatch_error(msg: impl Into<String>) -> Self {
        Self::DispatchError(msg.into())
    }

    /// Create a door interlock error
    pub fn door_interlock_error(msg: impl Into<String>) -> Self {
        Self::DoorInterlockError(msg.into())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailableError(msg.into())
    }

    /// Create a scenario error
    pub fn scenario_error(msg: impl Into<String>) -> Self {
        Self::ScenarioError(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors reject a single request and leave the column usable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ElevatorError::ConfigurationError(_) => false,
            ElevatorError::OutOfRangeError { .. } => true,
            ElevatorError::SensorStuckError { .. } => true,
            ElevatorError::DispatchError(_) => false,
            ElevatorError::DoorInterlockError(_) => false,
            ElevatorError::UnknownElevatorError(_) => true,
            ElevatorError::ColumnInactiveError(_) => true,
            ElevatorError::ServiceUnavailableError(_) => false,
            ElevatorError::ScenarioError(_) => true,
            ElevatorError::IoError(_) => true,
            ElevatorError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            ElevatorError::ConfigurationError(_) => "Configuration",
            ElevatorError::OutOfRangeError { .. } => "Out Of Range",
            ElevatorError::SensorStuckError { .. } => "Sensor",
            ElevatorError::DispatchError(_) => "Dispatch",
            ElevatorError::DoorInterlockError(_) => "Door Interlock",
            ElevatorError::UnknownElevatorError(_) => "Unknown Elevator",
            ElevatorError::ColumnInactiveError(_) => "Column Inactive",
            ElevatorError::ServiceUnavailableError(_) => "Service",
            ElevatorError::ScenarioError(_) => "Scenario",
            ElevatorError::IoError(_) => "IO",
            ElevatorError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for column operations
pub type ElevatorResult<T> = Result<T, ElevatorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_error = ElevatorError::configuration_error("Invalid config");
        assert!(matches!(config_error, ElevatorError::ConfigurationError(_)));
        assert_eq!(config_error.to_string(), "Configuration validation failed: Invalid config");

        let range_error = ElevatorError::out_of_range(11, 1, 10);
        assert_eq!(range_error.to_string(), "Floor 11 is out of range [1, 10]");
    }

    #[test]
    fn test_sensor_stuck_message() {
        let error = ElevatorError::SensorStuckError {
            elevator: ElevatorId::new(2),
            sensor: SensorKind::Weight,
            attempts: 6,
        };
        assert_eq!(error.to_string(), "Weight sensor on ELV_2 still blocked after 6 samples");
        assert_eq!(error.category(), "Sensor");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_error_from_validation_error() {
        let error: ElevatorError = ConfigValidationError::InvalidElevatorCount(0).into();
        assert!(matches!(error, ElevatorError::ConfigurationError(_)));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: ElevatorError = io_error.into();
        assert!(matches!(error, ElevatorError::IoError(_)));
        assert_eq!(error.category(), "IO");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ElevatorError::dispatch_error("none").category(), "Dispatch");
        assert_eq!(ElevatorError::door_interlock_error("moving").category(), "Door Interlock");
        assert_eq!(ElevatorError::ColumnInactiveError(ColumnId::new(1)).category(), "Column Inactive");
        assert_eq!(ElevatorError::UnknownElevatorError(ElevatorId::new(9)).category(), "Unknown Elevator");
        assert_eq!(ElevatorError::service_unavailable("gone").category(), "Service");
        assert_eq!(ElevatorError::scenario_error("bad").category(), "Scenario");
    }

    #[test]
    fn test_recoverability() {
        assert!(ElevatorError::out_of_range(0, 1, 10).is_recoverable());
        assert!(ElevatorError::ColumnInactiveError(ColumnId::new(1)).is_recoverable());
        assert!(!ElevatorError::door_interlock_error("moving").is_recoverable());
        assert!(!ElevatorError::service_unavailable("gone").is_recoverable());
    }
}
