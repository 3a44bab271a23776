//! Hall call buttons of a column

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::simulation::{ElevatorError, ElevatorResult};
use crate::types::{ButtonStatus, Direction, Floor};

/// Capability to switch hall calls off, lent to a cab while it services floors
pub trait CallClearer {
    /// Switch off the call at `floor` in `direction`; returns whether it was on
    fn clear_call(&mut self, floor: Floor, direction: Direction) -> bool;
}

/// Up and down call buttons for every floor of a column
///
/// The top floor has no up button and the bottom floor no down button.
#[derive(Clone, PartialEq, Eq)]
pub struct CallBoard {
    up: BTreeMap<Floor, ButtonStatus>,
    down: BTreeMap<Floor, ButtonStatus>,
}

impl CallBoard {
    /// Create a board with every button off
    pub fn new(min_floor: Floor, max_floor: Floor) -> Self {
        let up = (min_floor..max_floor).map(|floor| (floor, ButtonStatus::Off)).collect();
        let down = (min_floor..=max_floor).skip(1).map(|floor| (floor, ButtonStatus::Off)).collect();
        Self { up, down }
    }

    fn board(&self, direction: Direction) -> &BTreeMap<Floor, ButtonStatus> {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    fn board_mut(&mut self, direction: Direction) -> &mut BTreeMap<Floor, ButtonStatus> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }

    /// Floors that have a button for `direction`
    pub fn serviced_range(&self, direction: Direction) -> Option<RangeInclusive<Floor>> {
        let board = self.board(direction);
        let first = board.keys().next()?;
        let last = board.keys().next_back()?;
        Some(*first..=*last)
    }

    /// Press the button at `floor` for `direction`
    pub fn request_call(&mut self, floor: Floor, direction: Direction) -> ElevatorResult<()> {
        let range = self.serviced_range(direction);
        match self.board_mut(direction).get_mut(&floor) {
            Some(button) => {
                *button = ButtonStatus::On;
                Ok(())
            }
            None => {
                let (min_floor, max_floor) = range
                    .map(|r| (*r.start(), *r.end()))
                    .unwrap_or((floor, floor));
                Err(ElevatorError::out_of_range(floor, min_floor, max_floor))
            }
        }
    }

    /// Whether the button at `floor` for `direction` is lit
    pub fn is_active(&self, floor: Floor, direction: Direction) -> bool {
        self.status(floor, direction).is_some_and(ButtonStatus::is_on)
    }

    /// Button state, `None` when the floor has no such button
    pub fn status(&self, floor: Floor, direction: Direction) -> Option<ButtonStatus> {
        self.board(direction).get(&floor).copied()
    }

    /// Lit floors for `direction`, ascending
    pub fn pending_calls(&self, direction: Direction) -> Vec<Floor> {
        self.board(direction).iter().filter(|(_, b)| b.is_on()).map(|(f, _)| *f).collect()
    }

    /// Number of lit buttons on both boards
    pub fn pending_count(&self) -> usize {
        self.pending_calls(Direction::Up).len() + self.pending_calls(Direction::Down).len()
    }
}

impl CallClearer for CallBoard {
    fn clear_call(&mut self, floor: Floor, direction: Direction) -> bool {
        match self.board_mut(direction).get_mut(&floor) {
            Some(button) if button.is_on() => {
                *button = ButtonStatus::Off;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for CallBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallBoard")
            .field("up_range", &self.serviced_range(Direction::Up))
            .field("down_range", &self.serviced_range(Direction::Down))
            .field("pending_up", &self.pending_calls(Direction::Up))
            .field("pending_down", &self.pending_calls(Direction::Down))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_ranges_skip_terminal_floors() {
        let board = CallBoard::new(1, 10);
        assert_eq!(board.serviced_range(Direction::Up), Some(1..=9));
        assert_eq!(board.serviced_range(Direction::Down), Some(2..=10));
        assert_eq!(board.status(10, Direction::Up), None);
        assert_eq!(board.status(1, Direction::Down), None);
        assert_eq!(board.status(5, Direction::Up), Some(ButtonStatus::Off));
    }

    #[test]
    fn test_request_call_lights_button() {
        let mut board = CallBoard::new(-2, 5);
        board.request_call(-2, Direction::Up).unwrap();
        board.request_call(3, Direction::Down).unwrap();
        assert!(board.is_active(-2, Direction::Up));
        assert!(board.is_active(3, Direction::Down));
        assert!(!board.is_active(3, Direction::Up));
        assert_eq!(board.pending_calls(Direction::Down), vec![3]);
        assert_eq!(board.pending_count(), 2);
    }

    #[test]
    fn test_request_call_outside_board_is_an_error() {
        let mut board = CallBoard::new(1, 10);
        let error = board.request_call(10, Direction::Up).unwrap_err();
        assert!(matches!(
            error,
            ElevatorError::OutOfRangeError { floor: 10, min_floor: 1, max_floor: 9 }
        ));
        assert!(board.request_call(0, Direction::Down).is_err());
        assert_eq!(board.pending_count(), 0);
    }

    #[test]
    fn test_clear_call_is_idempotent() {
        let mut board = CallBoard::new(1, 10);
        board.request_call(4, Direction::Up).unwrap();

        assert!(board.clear_call(4, Direction::Up));
        let after_first = board.clone();
        assert!(!board.clear_call(4, Direction::Up));
        assert_eq!(board, after_first);
        // Clearing a button that does not exist is a no-op as well
        assert!(!board.clear_call(10, Direction::Up));
    }
}
