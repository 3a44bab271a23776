//! Cab and landing doors
//!
//! Each cab carries its own door plus a mirror of every landing door it serves.
//! A landing door only opens together with the cab door, and at most one
//! landing is open at a time. The cab opens the landing at the floor it stands on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::simulation::{ElevatorError, ElevatorResult};
use crate::types::{DoorStatus, Floor};

/// Where a door is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorLocation {
    /// The cab's own door
    Cab,
    /// The landing door at a floor
    Landing(Floor),
}

/// A single door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Mounting point
    pub location: DoorLocation,
    /// Current state
    pub status: DoorStatus,
}

impl Door {
    fn closed(location: DoorLocation) -> Self {
        Self { location, status: DoorStatus::Closed }
    }

    /// Whether the door is open
    pub fn is_open(&self) -> bool {
        self.status == DoorStatus::Opened
    }
}

/// The doors of one cab
#[derive(Debug, Clone)]
pub struct DoorController {
    cab: Door,
    landings: BTreeMap<Floor, Door>,
}

impl DoorController {
    /// Create closed doors for a cab serving `min_floor..=max_floor`
    pub fn new(min_floor: Floor, max_floor: Floor) -> Self {
        let landings = (min_floor..=max_floor)
            .map(|floor| (floor, Door::closed(DoorLocation::Landing(floor))))
            .collect();
        Self { cab: Door::closed(DoorLocation::Cab), landings }
    }

    /// Open the cab door and the landing door at `floor`
    ///
    /// Fails if another landing door is open or `floor` has no landing door.
    pub fn open(&mut self, floor: Floor) -> ElevatorResult<()> {
        if let Some(open) = self.open_landing().filter(|open| *open != floor) {
            return Err(ElevatorError::door_interlock_error(format!(
                "landing door at floor {} is still open",
                open
            )));
        }

        let landing = self.landings.get_mut(&floor).ok_or_else(|| {
            ElevatorError::door_interlock_error(format!("no landing door at floor {}", floor))
        })?;
        landing.status = DoorStatus::Opened;
        self.cab.status = DoorStatus::Opened;
        Ok(())
    }

    /// Close every open door, returning the landing floor that was open
    pub fn close(&mut self) -> Option<Floor> {
        let open = self.open_landing();
        if let Some(floor) = open {
            if let Some(landing) = self.landings.get_mut(&floor) {
                landing.status = DoorStatus::Closed;
            }
        }
        self.cab.status = DoorStatus::Closed;
        open
    }

    /// Whether the cab door and every landing door are closed
    pub fn all_closed(&self) -> bool {
        !self.cab.is_open() && self.landings.values().all(|door| !door.is_open())
    }

    /// Floor whose landing door is open, if any
    pub fn open_landing(&self) -> Option<Floor> {
        self.landings.values().find(|door| door.is_open()).and_then(|door| match door.location {
            DoorLocation::Landing(floor) => Some(floor),
            DoorLocation::Cab => None,
        })
    }

    /// State of the cab door
    pub fn cab_door(&self) -> DoorStatus {
        self.cab.status
    }

    /// State of the landing door at `floor`
    pub fn landing_door(&self, floor: Floor) -> Option<DoorStatus> {
        self.landings.get(&floor).map(|door| door.status)
    }

    /// Number of landing doors mirrored in the cab
    pub fn landing_count(&self) -> usize {
        self.landings.len()
    }
}
