//! Enumeration types for the elevator column simulator
//!
//! This module contains the status enumerations used throughout the simulation:
//! travel directions, elevator motion status, door, button, sensor, display and
//! column states, and the dispatcher's selection tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction requested by a rider pressing a hall call button
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Rider wants to travel to a higher floor
    Up,
    /// Rider wants to travel to a lower floor
    Down,
}

impl Direction {
    /// The opposite travel direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Direction needed to travel from `from` to `to`, or None when they are equal
    pub fn between(from: i32, to: i32) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// Motion status of an elevator cab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElevatorStatus {
    /// Stationary with no pending stops
    Idle,
    /// Sweeping upward through queued stops
    MovingUp,
    /// Sweeping downward through queued stops
    MovingDown,
}

impl ElevatorStatus {
    /// Whether the cab is idle
    pub fn is_idle(self) -> bool {
        matches!(self, ElevatorStatus::Idle)
    }

    /// Travel direction of a moving cab, None when idle
    pub fn direction(self) -> Option<Direction> {
        match self {
            ElevatorStatus::Idle => None,
            ElevatorStatus::MovingUp => Some(Direction::Up),
            ElevatorStatus::MovingDown => Some(Direction::Down),
        }
    }

    /// Whether the cab is moving in the given direction
    pub fn is_moving(self, direction: Direction) -> bool {
        self.direction() == Some(direction)
    }
}

impl From<Direction> for ElevatorStatus {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => ElevatorStatus::MovingUp,
            Direction::Down => ElevatorStatus::MovingDown,
        }
    }
}

impl fmt::Display for ElevatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorStatus::Idle => write!(f, "Idle"),
            ElevatorStatus::MovingUp => write!(f, "Moving Up"),
            ElevatorStatus::MovingDown => write!(f, "Moving Down"),
        }
    }
}

impl FromStr for ElevatorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(ElevatorStatus::Idle),
            "moving up" | "movingup" | "up" => Ok(ElevatorStatus::MovingUp),
            "moving down" | "movingdown" | "down" => Ok(ElevatorStatus::MovingDown),
            _ => Err(format!("Unknown elevator status: {}", s)),
        }
    }
}

/// State of a cab door or a floor landing door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorStatus {
    /// Door is open
    Opened,
    /// Door is closed
    Closed,
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorStatus::Opened => write!(f, "Opened"),
            DoorStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// State of a call or floor button lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonStatus {
    /// Request pending
    On,
    /// No request pending
    Off,
}

impl ButtonStatus {
    /// Whether the button is lit
    pub fn is_on(self) -> bool {
        matches!(self, ButtonStatus::On)
    }
}

impl fmt::Display for ButtonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonStatus::On => write!(f, "On"),
            ButtonStatus::Off => write!(f, "Off"),
        }
    }
}

/// State of a weight or obstruction sensor (On means blocked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorStatus {
    /// Sensor reports a blocking condition
    On,
    /// Sensor reports clear
    Off,
}

impl SensorStatus {
    /// Whether the sensor reports a blocking condition
    pub fn is_blocked(self) -> bool {
        matches!(self, SensorStatus::On)
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::On => write!(f, "On"),
            SensorStatus::Off => write!(f, "Off"),
        }
    }
}

/// Which cab sensor a reading or event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Load cell measuring the cab's weight
    Weight,
    /// Door-edge obstruction detector
    Obstruction,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Weight => write!(f, "Weight"),
            SensorKind::Obstruction => write!(f, "Obstruction"),
        }
    }
}

/// State of a floor display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStatus {
    /// Display powered
    On,
    /// Display dark
    Off,
}

/// Operational status of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnStatus {
    /// Column accepts calls
    Active,
    /// Column is out of service and rejects calls
    Inactive,
}

impl fmt::Display for ColumnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnStatus::Active => write!(f, "Active"),
            ColumnStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl FromStr for ColumnStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ColumnStatus::Active),
            "inactive" => Ok(ColumnStatus::Inactive),
            _ => Err(format!("Unknown column status: {}", s)),
        }
    }
}

/// Candidate tier that produced a dispatcher selection, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchTier {
    /// Moving in the requested direction and not yet past the call floor
    SameDirection,
    /// Idle cab
    Idle,
    /// Any moving cab, will detour to reach the call
    AnyMoving,
}

impl fmt::Display for DispatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchTier::SameDirection => write!(f, "Same Direction"),
            DispatchTier::Idle => write!(f, "Idle"),
            DispatchTier::AnyMoving => write!(f, "Any Moving"),
        }
    }
}
