//! Elevator selection for hall calls
//!
//! Candidates are tried in three tiers: cabs already sweeping toward the call
//! in the requested direction, then idle cabs, then any moving cab. Within the
//! first non-empty tier the nearest cab wins; equal distances go to the cab
//! listed first.

use tracing::debug;

use crate::elevator::ElevatorSnapshot;
use crate::simulation::{ElevatorError, ElevatorResult};
use crate::types::{Direction, DispatchTier, ElevatorId, Floor};

/// Outcome of a dispatch decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Chosen elevator
    pub elevator_id: ElevatorId,
    /// Position of the chosen elevator in the snapshot list
    pub index: usize,
    /// Tier the elevator was chosen from
    pub tier: DispatchTier,
    /// Floors between the elevator and the call
    pub distance: u32,
}

/// Whether the cab can answer the call on its current sweep
pub fn is_reachable(snapshot: &ElevatorSnapshot, call_floor: Floor, direction: Direction) -> bool {
    snapshot.status.is_moving(direction)
        && match direction {
            Direction::Up => snapshot.floor <= call_floor,
            Direction::Down => snapshot.floor >= call_floor,
        }
}

fn tier_of(snapshot: &ElevatorSnapshot, call_floor: Floor, direction: Direction) -> DispatchTier {
    if is_reachable(snapshot, call_floor, direction) {
        DispatchTier::SameDirection
    } else if snapshot.status.is_idle() {
        DispatchTier::Idle
    } else {
        DispatchTier::AnyMoving
    }
}

/// Nearest candidate by absolute floor distance, first one on ties
pub fn find_nearest_elevator<'a, I>(call_floor: Floor, candidates: I) -> Option<(usize, &'a ElevatorSnapshot)>
where
    I: IntoIterator<Item = (usize, &'a ElevatorSnapshot)>,
{
    candidates.into_iter().min_by_key(|(_, snapshot)| snapshot.floor.abs_diff(call_floor))
}

/// Pick the elevator that should answer a call
pub fn select_elevator(
    call_floor: Floor,
    direction: Direction,
    snapshots: &[ElevatorSnapshot],
) -> ElevatorResult<Selection> {
    if snapshots.is_empty() {
        return Err(ElevatorError::dispatch_error(format!(
            "no elevators to answer the call at floor {} going {}",
            call_floor, direction
        )));
    }

    for tier in [DispatchTier::SameDirection, DispatchTier::Idle, DispatchTier::AnyMoving] {
        let candidates = snapshots
            .iter()
            .enumerate()
            .filter(|(_, snapshot)| tier_of(snapshot, call_floor, direction) == tier);

        if let Some((index, snapshot)) = find_nearest_elevator(call_floor, candidates) {
            let selection = Selection {
                elevator_id: snapshot.id,
                index,
                tier,
                distance: snapshot.floor.abs_diff(call_floor),
            };
            debug!(
                elevator = %selection.elevator_id,
                call_floor,
                %direction,
                %tier,
                distance = selection.distance,
                "Elevator selected"
            );
            return Ok(selection);
        }
    }

    Err(ElevatorError::dispatch_error(format!(
        "no candidate tier matched the call at floor {}",
        call_floor
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElevatorStatus;

    fn snap(id: u32, floor: Floor, status: ElevatorStatus) -> ElevatorSnapshot {
        ElevatorSnapshot { id: ElevatorId::new(id), floor, status, pending_stops: 0 }
    }

    #[test]
    fn test_empty_column_is_a_dispatch_error() {
        let error = select_elevator(3, Direction::Up, &[]).unwrap_err();
        assert!(matches!(error, ElevatorError::DispatchError(_)));
    }

    #[test]
    fn test_nearest_idle_elevator_wins() {
        let snapshots = [snap(1, 2, ElevatorStatus::Idle), snap(2, 6, ElevatorStatus::Idle)];
        let selection = select_elevator(3, Direction::Up, &snapshots).unwrap();
        assert_eq!(selection.elevator_id, ElevatorId::new(1));
        assert_eq!(selection.tier, DispatchTier::Idle);
        assert_eq!(selection.distance, 1);
    }

    #[test]
    fn test_same_direction_beats_nearer_idle() {
        let snapshots = [snap(1, 5, ElevatorStatus::Idle), snap(2, 1, ElevatorStatus::MovingUp)];
        let selection = select_elevator(5, Direction::Up, &snapshots).unwrap();
        assert_eq!(selection.elevator_id, ElevatorId::new(2));
        assert_eq!(selection.tier, DispatchTier::SameDirection);
        assert_eq!(selection.index, 1);
    }

    #[test]
    fn test_cab_past_the_call_falls_to_idle_tier() {
        let snapshots = [snap(1, 7, ElevatorStatus::MovingUp), snap(2, 1, ElevatorStatus::Idle)];
        let selection = select_elevator(5, Direction::Up, &snapshots).unwrap();
        assert_eq!(selection.elevator_id, ElevatorId::new(2));
        assert_eq!(selection.tier, DispatchTier::Idle);
    }

    #[test]
    fn test_down_calls_use_mirrored_reachability() {
        let snapshots = [snap(1, 8, ElevatorStatus::MovingDown), snap(2, 4, ElevatorStatus::MovingDown)];
        let selection = select_elevator(6, Direction::Down, &snapshots).unwrap();
        assert_eq!(selection.elevator_id, ElevatorId::new(1));
        assert_eq!(selection.tier, DispatchTier::SameDirection);
    }

    #[test]
    fn test_any_moving_is_the_last_resort() {
        let snapshots = [snap(1, 9, ElevatorStatus::MovingUp), snap(2, 2, ElevatorStatus::MovingDown)];
        let selection = select_elevator(5, Direction::Up, &snapshots).unwrap();
        assert_eq!(selection.tier, DispatchTier::AnyMoving);
        assert_eq!(selection.elevator_id, ElevatorId::new(2));
    }

    #[test]
    fn test_ties_go_to_first_listed() {
        let snapshots = [
            snap(1, 3, ElevatorStatus::Idle),
            snap(2, 7, ElevatorStatus::Idle),
            snap(3, 3, ElevatorStatus::Idle),
        ];
        let selection = select_elevator(5, Direction::Down, &snapshots).unwrap();
        assert_eq!(selection.elevator_id, ElevatorId::new(1));

        let nearest = find_nearest_elevator(5, snapshots.iter().enumerate().skip(1)).unwrap();
        assert_eq!(nearest.0, 1);
    }
}
