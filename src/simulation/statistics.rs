//! Statistics collection and reporting
//!
//! Run statistics are folded from the status events a column emitted, so any
//! sink that records events (in memory or as JSON lines) can be summarized.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::events::{EventKind, StatusEvent};
use crate::types::{DispatchTier, ElevatorId};

/// Per-elevator counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevatorStatistics {
    /// Floors travelled
    pub floors_travelled: u64,
    /// Stops serviced (door openings)
    pub stops_serviced: u64,
    /// Hall calls assigned
    pub calls_answered: u64,
    /// Sensor wait samples
    pub sensor_waits: u64,
}

/// Counters for one simulated run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Events folded
    pub total_events: usize,
    /// Hall calls registered
    pub calls_registered: u64,
    /// Dispatches answered by a cab sweeping toward the call
    pub same_direction_dispatches: u64,
    /// Dispatches answered by an idle cab
    pub idle_dispatches: u64,
    /// Dispatches that fell back to any moving cab
    pub any_moving_dispatches: u64,
    /// Floor selections made inside cabs
    pub floor_requests: u64,
    /// Floors travelled by all cabs
    pub floors_travelled: u64,
    /// Door openings
    pub door_openings: u64,
    /// Door closings
    pub door_closings: u64,
    /// Door closings refused because of a blocked sensor
    pub door_close_refusals: u64,
    /// Blocked weight samples
    pub capacity_waits: u64,
    /// Blocked obstruction samples
    pub obstruction_waits: u64,
    /// Hall calls switched off
    pub calls_cleared: u64,
    /// Sweep starts and reversals
    pub direction_changes: u64,
    /// Counters per elevator
    pub per_elevator: BTreeMap<ElevatorId, ElevatorStatistics>,
    /// Timestamp of the first folded event
    pub first_event: Option<DateTime<Utc>>,
    /// Timestamp of the last folded event
    pub last_event: Option<DateTime<Utc>>,
}

impl RunStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of events
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a StatusEvent>) -> Self {
        let mut stats = Self::new();
        for event in events {
            stats.record(event);
        }
        stats
    }

    fn elevator_mut(&mut self, elevator: ElevatorId) -> &mut ElevatorStatistics {
        self.per_elevator.entry(elevator).or_default()
    }

    /// Fold one event
    pub fn record(&mut self, event: &StatusEvent) {
        self.total_events += 1;
        self.first_event = Some(self.first_event.map_or(event.timestamp, |t| t.min(event.timestamp)));
        self.last_event = Some(self.last_event.map_or(event.timestamp, |t| t.max(event.timestamp)));

        match &event.kind {
            EventKind::ColumnCreated { .. } | EventKind::StopQueued { .. } => {}
            EventKind::ElevatorCreated { elevator, .. } => {
                self.elevator_mut(*elevator);
            }
            EventKind::CallRegistered { .. } => self.calls_registered += 1,
            EventKind::ElevatorCalled { elevator, tier, .. } => {
                match tier {
                    DispatchTier::SameDirection => self.same_direction_dispatches += 1,
                    DispatchTier::Idle => self.idle_dispatches += 1,
                    DispatchTier::AnyMoving => self.any_moving_dispatches += 1,
                }
                self.elevator_mut(*elevator).calls_answered += 1;
            }
            EventKind::FloorRequested { .. } => self.floor_requests += 1,
            EventKind::FloorReached { elevator, .. } => {
                self.floors_travelled += 1;
                self.elevator_mut(*elevator).floors_travelled += 1;
            }
            EventKind::DoorOpened { elevator, .. } => {
                self.door_openings += 1;
                self.elevator_mut(*elevator).stops_serviced += 1;
            }
            EventKind::DoorClosed { .. } => self.door_closings += 1,
            EventKind::DoorCloseRefused { .. } => self.door_close_refusals += 1,
            EventKind::CapacityWait { elevator, .. } => {
                self.capacity_waits += 1;
                self.elevator_mut(*elevator).sensor_waits += 1;
            }
            EventKind::ObstructionWait { elevator, .. } => {
                self.obstruction_waits += 1;
                self.elevator_mut(*elevator).sensor_waits += 1;
            }
            EventKind::SensorCleared { .. } | EventKind::ElevatorIdle { .. } => {}
            EventKind::CallCleared { .. } => self.calls_cleared += 1,
            EventKind::DirectionChanged { .. } => self.direction_changes += 1,
        }
    }

    /// Merge counters from another run
    pub fn merge(&mut self, other: &RunStatistics) {
        self.total_events += other.total_events;
        self.calls_registered += other.calls_registered;
        self.same_direction_dispatches += other.same_direction_dispatches;
        self.idle_dispatches += other.idle_dispatches;
        self.any_moving_dispatches += other.any_moving_dispatches;
        self.floor_requests += other.floor_requests;
        self.floors_travelled += other.floors_travelled;
        self.door_openings += other.door_openings;
        self.door_closings += other.door_closings;
        self.door_close_refusals += other.door_close_refusals;
        self.capacity_waits += other.capacity_waits;
        self.obstruction_waits += other.obstruction_waits;
        self.calls_cleared += other.calls_cleared;
        self.direction_changes += other.direction_changes;
        for (elevator, theirs) in &other.per_elevator {
            let ours = self.elevator_mut(*elevator);
            ours.floors_travelled += theirs.floors_travelled;
            ours.stops_serviced += theirs.stops_serviced;
            ours.calls_answered += theirs.calls_answered;
            ours.sensor_waits += theirs.sensor_waits;
        }
        self.first_event = match (self.first_event, other.first_event) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.last_event = match (self.last_event, other.last_event) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Total dispatch decisions
    pub fn total_dispatches(&self) -> u64 {
        self.same_direction_dispatches + self.idle_dispatches + self.any_moving_dispatches
    }

    /// Total blocked sensor samples
    pub fn total_sensor_waits(&self) -> u64 {
        self.capacity_waits + self.obstruction_waits
    }

    /// Simulated time between the first and last event
    pub fn simulated_duration(&self) -> Duration {
        match (self.first_event, self.last_event) {
            (Some(first), Some(last)) => last - first,
            _ => Duration::zero(),
        }
    }

    /// Average floors travelled per dispatch
    pub fn average_floors_per_dispatch(&self) -> f64 {
        match self.total_dispatches() {
            0 => 0.0,
            dispatches => self.floors_travelled as f64 / dispatches as f64,
        }
    }

    /// One-line summary
    pub fn compact_summary(&self) -> String {
        format!(
            "{} calls, {} floor requests, {} floors travelled, {} stops, {} sensor waits",
            self.calls_registered,
            self.floor_requests,
            self.floors_travelled,
            self.door_openings,
            self.total_sensor_waits()
        )
    }

    /// Multi-line report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Run Statistics ===\n");
        report.push_str(&format!("Events: {}\n", self.total_events));
        report.push_str(&format!("Simulated time: {}s\n", self.simulated_duration().num_seconds()));
        report.push_str(&format!("Calls registered: {}\n", self.calls_registered));
        report.push_str(&format!(
            "Dispatches: {} (same direction: {}, idle: {}, any moving: {})\n",
            self.total_dispatches(),
            self.same_direction_dispatches,
            self.idle_dispatches,
            self.any_moving_dispatches
        ));
        report.push_str(&format!("Floor requests: {}\n", self.floor_requests));
        report.push_str(&format!(
            "Floors travelled: {} ({:.1} per dispatch)\n",
            self.floors_travelled,
            self.average_floors_per_dispatch()
        ));
        report.push_str(&format!(
            "Doors: {} opened, {} closed, {} refusals\n",
            self.door_openings, self.door_closings, self.door_close_refusals
        ));
        report.push_str(&format!(
            "Sensor waits: {} capacity, {} obstruction\n",
            self.capacity_waits, self.obstruction_waits
        ));
        report.push_str(&format!(
            "Calls cleared: {}, direction changes: {}\n",
            self.calls_cleared, self.direction_changes
        ));
        for (elevator, stats) in &self.per_elevator {
            report.push_str(&format!(
                "  {}: {} floors, {} stops, {} calls, {} sensor waits\n",
                elevator,
                stats.floors_travelled,
                stats.stops_serviced,
                stats.calls_answered,
                stats.sensor_waits
            ));
        }
        report
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnId, Direction, ElevatorStatus};
    use chrono::TimeZone;

    fn at(seconds: i64, kind: EventKind) -> StatusEvent {
        let timestamp = Utc.timestamp_opt(seconds, 0).unwrap();
        StatusEvent::new(timestamp, ColumnId::new(1), kind)
    }

    fn sample_run() -> Vec<StatusEvent> {
        let e1 = ElevatorId::new(1);
        vec![
            at(0, EventKind::CallRegistered { floor: 3, direction: Direction::Up }),
            at(0, EventKind::ElevatorCalled {
                elevator: e1,
                floor: 3,
                direction: Direction::Up,
                tier: DispatchTier::Idle,
                distance: 2,
            }),
            at(2, EventKind::FloorReached { elevator: e1, floor: 2, status: ElevatorStatus::MovingUp }),
            at(4, EventKind::FloorReached { elevator: e1, floor: 3, status: ElevatorStatus::MovingUp }),
            at(4, EventKind::DoorOpened { elevator: e1, floor: 3 }),
            at(5, EventKind::CapacityWait { elevator: e1, floor: 3, attempt: 1, reading: 620 }),
            at(5, EventKind::DoorClosed { elevator: e1, floor: 3 }),
            at(5, EventKind::CallCleared { elevator: e1, floor: 3, direction: Direction::Up }),
        ]
    }

    #[test]
    fn test_from_events_counts() {
        let events = sample_run();
        let stats = RunStatistics::from_events(&events);

        assert_eq!(stats.total_events, 8);
        assert_eq!(stats.calls_registered, 1);
        assert_eq!(stats.idle_dispatches, 1);
        assert_eq!(stats.total_dispatches(), 1);
        assert_eq!(stats.floors_travelled, 2);
        assert_eq!(stats.door_openings, 1);
        assert_eq!(stats.capacity_waits, 1);
        assert_eq!(stats.calls_cleared, 1);
        assert_eq!(stats.simulated_duration(), Duration::seconds(5));
        assert_eq!(stats.average_floors_per_dispatch(), 2.0);

        let e1 = &stats.per_elevator[&ElevatorId::new(1)];
        assert_eq!(e1.floors_travelled, 2);
        assert_eq!(e1.sensor_waits, 1);
        assert_eq!(e1.calls_answered, 1);
    }

    #[test]
    fn test_merge_adds_counters() {
        let events = sample_run();
        let mut total = RunStatistics::from_events(&events);
        let again = RunStatistics::from_events(&events);
        total.merge(&again);

        assert_eq!(total.total_events, 16);
        assert_eq!(total.floors_travelled, 4);
        assert_eq!(total.per_elevator[&ElevatorId::new(1)].stops_serviced, 2);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = RunStatistics::new();
        assert_eq!(stats.simulated_duration(), Duration::zero());
        assert_eq!(stats.average_floors_per_dispatch(), 0.0);
        assert!(stats.compact_summary().starts_with("0 calls"));
    }

    #[test]
    fn test_summary_report_lists_elevators() {
        let stats = RunStatistics::from_events(&sample_run());
        let report = stats.to_string();
        assert!(report.contains("Calls registered: 1"));
        assert!(report.contains("ELV_1: 2 floors"));
    }
}
