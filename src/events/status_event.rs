//! Status events emitted by a column and its elevators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{
    ColumnId, ColumnStatus, Direction, DispatchTier, ElevatorId, ElevatorStatus, EventId, Floor,
    SensorKind,
};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Column constructed
    ColumnCreated {
        /// Operational status at construction
        status: ColumnStatus,
        /// Lowest served floor
        min_floor: Floor,
        /// Highest served floor
        max_floor: Floor,
        /// Number of elevators
        elevator_count: usize,
    },
    /// Elevator constructed
    ElevatorCreated {
        /// New elevator
        elevator: ElevatorId,
        /// Starting floor
        floor: Floor,
    },
    /// A hall call button was pressed
    CallRegistered {
        /// Call floor
        floor: Floor,
        /// Requested direction
        direction: Direction,
    },
    /// The dispatcher assigned an elevator to a call
    ElevatorCalled {
        /// Selected elevator
        elevator: ElevatorId,
        /// Call floor
        floor: Floor,
        /// Requested direction
        direction: Direction,
        /// Candidate tier the elevator came from
        tier: DispatchTier,
        /// Floors between the elevator and the call
        distance: u32,
    },
    /// A floor joined an elevator's stop queue
    StopQueued {
        /// Elevator
        elevator: ElevatorId,
        /// Queued floor
        floor: Floor,
    },
    /// A rider selected a floor inside the cab
    FloorRequested {
        /// Elevator
        elevator: ElevatorId,
        /// Selected floor
        floor: Floor,
    },
    /// The cab arrived at a floor
    FloorReached {
        /// Elevator
        elevator: ElevatorId,
        /// Floor reached
        floor: Floor,
        /// Motion status while arriving
        status: ElevatorStatus,
    },
    /// Cab and landing doors opened
    DoorOpened {
        /// Elevator
        elevator: ElevatorId,
        /// Landing floor
        floor: Floor,
    },
    /// Cab and landing doors closed
    DoorClosed {
        /// Elevator
        elevator: ElevatorId,
        /// Landing floor
        floor: Floor,
    },
    /// Doors stayed open because a sensor reported blocked
    DoorCloseRefused {
        /// Elevator
        elevator: ElevatorId,
        /// Landing floor
        floor: Floor,
        /// Sensor holding the doors
        sensor: SensorKind,
    },
    /// The cab is over capacity and waits for load to drop
    CapacityWait {
        /// Elevator
        elevator: ElevatorId,
        /// Floor of the cab
        floor: Floor,
        /// Blocked sample number (1-based)
        attempt: u32,
        /// Raw weight reading in kilograms
        reading: u32,
    },
    /// Something blocks the doorway and the cab waits for it to clear
    ObstructionWait {
        /// Elevator
        elevator: ElevatorId,
        /// Floor of the cab
        floor: Floor,
        /// Blocked sample number (1-based)
        attempt: u32,
        /// Raw obstruction reading
        reading: u32,
    },
    /// A sensor that had been blocked reads clear again
    SensorCleared {
        /// Elevator
        elevator: ElevatorId,
        /// Sensor that cleared
        sensor: SensorKind,
        /// Blocked samples before it cleared
        waits: u32,
    },
    /// A hall call button was switched off
    CallCleared {
        /// Elevator that serviced the call
        elevator: ElevatorId,
        /// Call floor
        floor: Floor,
        /// Call direction
        direction: Direction,
    },
    /// The cab started or reversed a sweep
    DirectionChanged {
        /// Elevator
        elevator: ElevatorId,
        /// Floor of the cab
        floor: Floor,
        /// New motion status
        status: ElevatorStatus,
    },
    /// The cab has no stops left
    ElevatorIdle {
        /// Elevator
        elevator: ElevatorId,
        /// Floor the cab rests at
        floor: Floor,
    },
}

impl EventKind {
    /// Elevator the event concerns, if any
    pub fn elevator(&self) -> Option<ElevatorId> {
        match self {
            EventKind::ColumnCreated { .. } | EventKind::CallRegistered { .. } => None,
            EventKind::ElevatorCreated { elevator, .. }
            | EventKind::ElevatorCalled { elevator, .. }
            | EventKind::StopQueued { elevator, .. }
            | EventKind::FloorRequested { elevator, .. }
            | EventKind::FloorReached { elevator, .. }
            | EventKind::DoorOpened { elevator, .. }
            | EventKind::DoorClosed { elevator, .. }
            | EventKind::DoorCloseRefused { elevator, .. }
            | EventKind::CapacityWait { elevator, .. }
            | EventKind::ObstructionWait { elevator, .. }
            | EventKind::SensorCleared { elevator, .. }
            | EventKind::CallCleared { elevator, .. }
            | EventKind::DirectionChanged { elevator, .. }
            | EventKind::ElevatorIdle { elevator, .. } => Some(*elevator),
        }
    }

    /// Short machine-friendly name, matching the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ColumnCreated { .. } => "column_created",
            EventKind::ElevatorCreated { .. } => "elevator_created",
            EventKind::CallRegistered { .. } => "call_registered",
            EventKind::ElevatorCalled { .. } => "elevator_called",
            EventKind::StopQueued { .. } => "stop_queued",
            EventKind::FloorRequested { .. } => "floor_requested",
            EventKind::FloorReached { .. } => "floor_reached",
            EventKind::DoorOpened { .. } => "door_opened",
            EventKind::DoorClosed { .. } => "door_closed",
            EventKind::DoorCloseRefused { .. } => "door_close_refused",
            EventKind::CapacityWait { .. } => "capacity_wait",
            EventKind::ObstructionWait { .. } => "obstruction_wait",
            EventKind::SensorCleared { .. } => "sensor_cleared",
            EventKind::CallCleared { .. } => "call_cleared",
            EventKind::DirectionChanged { .. } => "direction_changed",
            EventKind::ElevatorIdle { .. } => "elevator_idle",
        }
    }

    /// Whether the event reports a sensor holding the cab
    pub fn is_sensor_wait(&self) -> bool {
        matches!(
            self,
            EventKind::CapacityWait { .. }
                | EventKind::ObstructionWait { .. }
                | EventKind::DoorCloseRefused { .. }
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::ColumnCreated { status, min_floor, max_floor, elevator_count } => write!(
                f,
                "Column created ({}) serving floors {} to {} with {} elevators",
                status, min_floor, max_floor, elevator_count
            ),
            EventKind::ElevatorCreated { elevator, floor } => {
                write!(f, "{} created at floor {}", elevator, floor)
            }
            EventKind::CallRegistered { floor, direction } => {
                write!(f, "Call registered at floor {} going {}", floor, direction)
            }
            EventKind::ElevatorCalled { elevator, floor, direction, tier, distance } => write!(
                f,
                "{} called to floor {} going {} ({} tier, {} floors away)",
                elevator, floor, direction, tier, distance
            ),
            EventKind::StopQueued { elevator, floor } => {
                write!(f, "{} queued floor {}", elevator, floor)
            }
            EventKind::FloorRequested { elevator, floor } => {
                write!(f, "Floor {} selected inside {}", floor, elevator)
            }
            EventKind::FloorReached { elevator, floor, status } => {
                write!(f, "{} is at floor {} ({})", elevator, floor, status)
            }
            EventKind::DoorOpened { elevator, floor } => {
                write!(f, "{} doors opened at floor {}", elevator, floor)
            }
            EventKind::DoorClosed { elevator, floor } => {
                write!(f, "{} doors closed at floor {}", elevator, floor)
            }
            EventKind::DoorCloseRefused { elevator, floor, sensor } => write!(
                f,
                "{} doors held open at floor {} by the {} sensor",
                elevator, floor, sensor
            ),
            EventKind::CapacityWait { elevator, floor, attempt, reading } => write!(
                f,
                "{} capacity reached at floor {} ({} kg), waiting (attempt {})",
                elevator, floor, reading, attempt
            ),
            EventKind::ObstructionWait { elevator, floor, attempt, reading } => write!(
                f,
                "{} doorway obstructed at floor {} (reading {}), waiting (attempt {})",
                elevator, floor, reading, attempt
            ),
            EventKind::SensorCleared { elevator, sensor, waits } => {
                write!(f, "{} {} sensor clear after {} waits", elevator, sensor, waits)
            }
            EventKind::CallCleared { elevator, floor, direction } => {
                write!(f, "{} answered the {} call at floor {}", elevator, direction, floor)
            }
            EventKind::DirectionChanged { elevator, floor, status } => {
                write!(f, "{} now {} from floor {}", elevator, status, floor)
            }
            EventKind::ElevatorIdle { elevator, floor } => {
                write!(f, "{} is idle at floor {}", elevator, floor)
            }
        }
    }
}

/// A timestamped status event from one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Unique event identifier
    pub id: EventId,
    /// Simulated time of the event
    pub timestamp: DateTime<Utc>,
    /// Column that emitted the event
    pub column_id: ColumnId,
    /// Event payload
    #[serde(flatten)]
    pub kind: EventKind,
}

impl StatusEvent {
    /// Create a new status event
    pub fn new(timestamp: DateTime<Utc>, column_id: ColumnId, kind: EventKind) -> Self {
        Self { id: EventId::new(), timestamp, column_id, kind }
    }

    /// Elevator the event concerns, if any
    pub fn elevator(&self) -> Option<ElevatorId> {
        self.kind.elevator()
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp.format("%H:%M:%S%.3f"), self.column_id, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names_match_serialized_tag() {
        let kind = EventKind::CapacityWait {
            elevator: ElevatorId::new(1),
            floor: 3,
            attempt: 2,
            reading: 640,
        };
        let value = serde_json::to_value(&kind).unwrap();
        assert_eq!(value["type"], kind.name());
        assert_eq!(value["attempt"], 2);
        assert!(kind.is_sensor_wait());
    }

    #[test]
    fn test_status_event_serializes_flat() {
        let event = StatusEvent::new(
            Utc::now(),
            ColumnId::new(1),
            EventKind::FloorReached {
                elevator: ElevatorId::new(2),
                floor: 7,
                status: ElevatorStatus::MovingUp,
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"floor_reached\""));
        assert!(json.contains("\"column_id\":1"));

        let back: StatusEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.elevator(), Some(ElevatorId::new(2)));
    }

    #[test]
    fn test_column_level_events_have_no_elevator() {
        let kind = EventKind::CallRegistered { floor: 4, direction: Direction::Down };
        assert_eq!(kind.elevator(), None);
        assert_eq!(kind.to_string(), "Call registered at floor 4 going Down");
    }

    #[test]
    fn test_display_reads_like_a_controller_log() {
        let kind = EventKind::FloorReached {
            elevator: ElevatorId::new(1),
            floor: 3,
            status: ElevatorStatus::MovingUp,
        };
        assert_eq!(kind.to_string(), "ELV_1 is at floor 3 (Moving Up)");
    }
}
