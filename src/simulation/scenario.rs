//! Scripted scenarios
//!
//! A scenario places cabs, then replays hall calls and in-cab floor selections
//! against a fresh column. Calls may name the elevator expected to answer.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::simulation::{ElevatorError, ElevatorResult};
use crate::types::{Direction, ElevatorStatus, Floor};

/// Initial position of one cab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Elevator number within the column
    pub elevator: u32,
    /// Floor to place the cab at
    pub floor: Floor,
    /// Motion status to start in
    #[serde(default = "idle")]
    pub status: ElevatorStatus,
}

fn idle() -> ElevatorStatus {
    ElevatorStatus::Idle
}

/// One scripted action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Rider at `floor` presses the hall button for `direction`
    Call {
        /// Call floor
        floor: Floor,
        /// Requested direction
        direction: Direction,
        /// Elevator expected to answer
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect: Option<u32>,
    },
    /// Rider inside `elevator` selects `floor`
    SelectFloor {
        /// Elevator number
        elevator: u32,
        /// Destination floor
        floor: Floor,
    },
    /// Reposition a cab between requests
    Place(Placement),
}

impl Step {
    /// Short label for reports
    pub fn describe(&self) -> String {
        match self {
            Step::Call { floor, direction, .. } => format!("call at floor {} going {}", floor, direction),
            Step::SelectFloor { elevator, floor } => format!("ELV_{} selects floor {}", elevator, floor),
            Step::Place(p) => format!("place ELV_{} at floor {} ({})", p.elevator, p.floor, p.status),
        }
    }
}

/// A named scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// What the scenario exercises
    #[serde(default)]
    pub description: String,
    /// Cab positions before the first step
    #[serde(default)]
    pub placements: Vec<Placement>,
    /// Actions in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            placements: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Add an initial placement
    pub fn place(mut self, elevator: u32, floor: Floor, status: ElevatorStatus) -> Self {
        self.placements.push(Placement { elevator, floor, status });
        self
    }

    /// Add a hall call expecting `expect` to answer
    pub fn call(mut self, floor: Floor, direction: Direction, expect: Option<u32>) -> Self {
        self.steps.push(Step::Call { floor, direction, expect });
        self
    }

    /// Add an in-cab floor selection
    pub fn select_floor(mut self, elevator: u32, floor: Floor) -> Self {
        self.steps.push(Step::SelectFloor { elevator, floor });
        self
    }

    /// Add a repositioning step
    pub fn then_place(mut self, elevator: u32, floor: Floor, status: ElevatorStatus) -> Self {
        self.steps.push(Step::Place(Placement { elevator, floor, status }));
        self
    }

    /// Load a scenario from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ElevatorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&content)?;
        if scenario.steps.is_empty() {
            return Err(ElevatorError::scenario_error(format!(
                "scenario '{}' in {} has no steps",
                scenario.name,
                path.display()
            )));
        }
        Ok(scenario)
    }
}

/// Scenarios bundled with the simulator, all on a ten-floor two-cab column
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "scenario1",
            "Nearest idle cab answers and carries the rider up",
        )
        .place(1, 2, ElevatorStatus::Idle)
        .place(2, 6, ElevatorStatus::Idle)
        .call(3, Direction::Up, Some(1))
        .select_floor(1, 7),
        Scenario::new(
            "scenario2",
            "Three riders served by whichever idle cab is closest",
        )
        .place(1, 10, ElevatorStatus::Idle)
        .place(2, 3, ElevatorStatus::Idle)
        .call(1, Direction::Up, Some(2))
        .select_floor(2, 6)
        .call(3, Direction::Up, Some(2))
        .select_floor(2, 5)
        .call(9, Direction::Down, Some(1))
        .select_floor(1, 2),
        Scenario::new(
            "scenario3",
            "A cab moving away from the call is passed over for an idle one",
        )
        .place(1, 10, ElevatorStatus::Idle)
        .place(2, 3, ElevatorStatus::MovingUp)
        .call(3, Direction::Down, Some(1))
        .select_floor(1, 2)
        .then_place(2, 6, ElevatorStatus::Idle)
        .call(10, Direction::Down, Some(2))
        .select_floor(2, 3),
    ]
}

/// Look up a built-in scenario by name
pub fn find_builtin(name: &str) -> Option<Scenario> {
    builtin_scenarios().into_iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtins_are_named() {
        let names: Vec<String> = builtin_scenarios().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["scenario1", "scenario2", "scenario3"]);
        assert!(find_builtin("SCENARIO2").is_some());
        assert!(find_builtin("scenario9").is_none());
    }

    #[test]
    fn test_step_json_shape() {
        let step = Step::Call { floor: 3, direction: Direction::Up, expect: None };
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"action":"call","floor":3,"direction":"Up"}"#);

        let place: Step =
            serde_json::from_str(r#"{"action":"place","elevator":2,"floor":6}"#).unwrap();
        assert_eq!(
            place,
            Step::Place(Placement { elevator: 2, floor: 6, status: ElevatorStatus::Idle })
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "lobby",
                "placements": [{{"elevator": 1, "floor": 4}}],
                "steps": [
                    {{"action": "call", "floor": 1, "direction": "Up", "expect": 1}},
                    {{"action": "select_floor", "elevator": 1, "floor": 8}}
                ]
            }}"#
        )
        .unwrap();

        let scenario = Scenario::from_file(file.path()).unwrap();
        assert_eq!(scenario.name, "lobby");
        assert_eq!(scenario.placements.len(), 1);
        assert_eq!(scenario.steps[1], Step::SelectFloor { elevator: 1, floor: 8 });
    }

    #[test]
    fn test_from_file_rejects_empty_steps() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "nothing", "steps": []}}"#).unwrap();
        let error = Scenario::from_file(file.path()).unwrap_err();
        assert!(matches!(error, ElevatorError::ScenarioError(_)));
    }
}
