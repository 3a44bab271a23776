//! Tests for scripted scenarios and the orchestrator
//!
//! The built-in scenarios script three residential runs; these
//! tests check who answers each call and where every cab ends up.

use elevator_column_simulator::events::{JsonLinesSink, NullSink, RecordingSink};
use elevator_column_simulator::sensors::ClearSignal;
use elevator_column_simulator::simulation::{
    builtin_scenarios, find_builtin, Scenario, ScenarioOrchestrator, Step,
};
use elevator_column_simulator::types::{ColumnConfig, Direction, ElevatorId, ElevatorStatus};
use std::io::{BufRead, BufReader, Write};
use tempfile::NamedTempFile;

fn orchestrator() -> ScenarioOrchestrator {
    ScenarioOrchestrator::new(ColumnConfig::residential(10, 2)).with_signals(|_| Box::new(ClearSignal))
}

fn floors_after(name: &str) -> Vec<(ElevatorId, i32)> {
    let scenario = find_builtin(name).unwrap();
    let report = orchestrator().run(&scenario, Box::new(NullSink)).unwrap();
    assert!(report.passed(), "{}", report);
    report.final_state.iter().map(|s| (s.id, s.floor)).collect()
}

#[test]
fn test_scenario1_final_positions() {
    assert_eq!(floors_after("scenario1"), vec![(ElevatorId::new(1), 7), (ElevatorId::new(2), 6)]);
}

#[test]
fn test_scenario2_final_positions() {
    assert_eq!(floors_after("scenario2"), vec![(ElevatorId::new(1), 2), (ElevatorId::new(2), 5)]);
}

#[test]
fn test_scenario3_final_positions() {
    assert_eq!(floors_after("scenario3"), vec![(ElevatorId::new(1), 2), (ElevatorId::new(2), 3)]);
}

/// Every call in the built-ins names the cab that should answer it
#[test]
fn test_builtin_calls_all_have_expectations() {
    for scenario in builtin_scenarios() {
        for step in &scenario.steps {
            if let Step::Call { expect, .. } = step {
                assert!(expect.is_some(), "{} has an unchecked call", scenario.name);
            }
        }
    }
}

/// Randomized sensors delay the run but never change the dispatch outcome
#[test]
fn test_builtins_pass_with_seeded_random_sensors() {
    let config = ColumnConfig { seed: Some(2023), ..ColumnConfig::residential(10, 2) };
    let orchestrator = ScenarioOrchestrator::new(config);
    for scenario in builtin_scenarios() {
        let report = orchestrator.run(&scenario, Box::new(NullSink)).unwrap();
        assert!(report.passed(), "{}", report);
    }
}

/// Events reach the caller's sink as well as the report statistics
#[test]
fn test_events_forwarded_to_caller_sink() {
    let sink = RecordingSink::new();
    let report = orchestrator().run(&builtin_scenarios()[1], Box::new(sink.clone())).unwrap();

    assert_eq!(report.statistics.total_events, sink.len());
    assert_eq!(report.statistics.calls_registered, 3);
    assert_eq!(report.statistics.floor_requests, 3);
    assert_eq!(report.statistics.calls_cleared, 3);
}

/// JSON lines output has one parseable event per line
#[test]
fn test_json_lines_output() {
    let output = NamedTempFile::new().unwrap();
    let file = output.reopen().unwrap();
    let report = orchestrator()
        .run(&builtin_scenarios()[0], Box::new(JsonLinesSink::new(file)))
        .unwrap();

    let lines: Vec<serde_json::Value> = BufReader::new(output.reopen().unwrap())
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();
    assert_eq!(lines.len(), report.statistics.total_events);
    assert_eq!(lines[0]["type"], "column_created");
    assert!(lines.iter().any(|line| line["type"] == "elevator_called" && line["elevator"] == 1));
}

/// Scenario files use the same step vocabulary
#[test]
fn test_scenario_file_round_trip_through_orchestrator() {
    let scenario = Scenario::new("file", "written to disk")
        .place(1, 1, ElevatorStatus::Idle)
        .place(2, 10, ElevatorStatus::Idle)
        .call(8, Direction::Down, Some(2))
        .select_floor(2, 1);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&scenario).unwrap().as_bytes()).unwrap();

    let loaded = Scenario::from_file(file.path()).unwrap();
    assert_eq!(loaded, scenario);

    let report = orchestrator().run(&loaded, Box::new(NullSink)).unwrap();
    assert!(report.passed());
    assert_eq!(report.final_state[1].floor, 1);
}
