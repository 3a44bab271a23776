//! Scenario orchestrator
//!
//! Runs a [`Scenario`] against a fresh column and reports what happened at each
//! step, including calls answered by an elevator other than the expected one.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::column::Column;
use crate::elevator::ElevatorSnapshot;
use crate::events::{EventSink, FanoutSink, RecordingSink};
use crate::sensors::EnvironmentSignal;
use crate::simulation::{
    ElevatorError, ElevatorResult, RunStatistics, Scenario, SimulationClock, Step,
};
use crate::types::{ColumnConfig, ElevatorId};

type SignalFactory = Arc<dyn Fn(ElevatorId) -> Box<dyn EnvironmentSignal> + Send + Sync>;

/// What happened at one scenario step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Position of the step in the scenario
    pub index: usize,
    /// Human-readable step label
    pub description: String,
    /// Elevator that answered a call
    pub answered_by: Option<ElevatorId>,
    /// Elevator the scenario expected to answer
    pub expected: Option<ElevatorId>,
    /// Error message if the step failed
    pub error: Option<String>,
}

impl StepOutcome {
    /// Whether the step ran and met its expectation
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && match self.expected {
                Some(expected) => self.answered_by == Some(expected),
                None => true,
            }
    }
}

/// Result of running a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Per-step outcomes
    pub outcomes: Vec<StepOutcome>,
    /// Cab states after the last step
    pub final_state: Vec<ElevatorSnapshot>,
    /// Counters folded from the run's events
    pub statistics: RunStatistics,
}

impl ScenarioReport {
    /// Steps that failed or answered with an unexpected elevator
    pub fn mismatches(&self) -> Vec<&StepOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    /// Whether every step passed
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::passed)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        writeln!(f, "Scenario {} [{}]", self.name, verdict)?;
        for outcome in &self.outcomes {
            write!(f, "  {}. {}", outcome.index + 1, outcome.description)?;
            if let Some(elevator) = outcome.answered_by {
                write!(f, " -> {}", elevator)?;
            }
            if let (Some(expected), false) = (outcome.expected, outcome.passed()) {
                write!(f, " (expected {})", expected)?;
            }
            if let Some(error) = &outcome.error {
                write!(f, " FAILED: {}", error)?;
            }
            writeln!(f)?;
        }
        for snapshot in &self.final_state {
            writeln!(
                f,
                "  {} at floor {} ({})",
                snapshot.id, snapshot.floor, snapshot.status
            )?;
        }
        Ok(())
    }
}

/// Runs scenarios against freshly built columns
#[derive(Clone)]
pub struct ScenarioOrchestrator {
    config: ColumnConfig,
    signals: Option<SignalFactory>,
    start: Option<DateTime<Utc>>,
}

impl fmt::Debug for ScenarioOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioOrchestrator")
            .field("config", &self.config)
            .field("custom_signals", &self.signals.is_some())
            .field("start", &self.start)
            .finish()
    }
}

impl ScenarioOrchestrator {
    /// Create an orchestrator for columns built from `config`
    pub fn new(config: ColumnConfig) -> Self {
        Self { config, signals: None, start: None }
    }

    /// Use caller-supplied sensor signals instead of randomized ones
    pub fn with_signals<F>(mut self, factory: F) -> Self
    where
        F: Fn(ElevatorId) -> Box<dyn EnvironmentSignal> + Send + Sync + 'static,
    {
        self.signals = Some(Arc::new(factory));
        self
    }

    /// Start every run's clock at a fixed instant
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Column configuration used for each run
    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    fn build_column(&self, sink: Box<dyn EventSink>) -> ElevatorResult<Column> {
        let column = match &self.signals {
            Some(factory) => Column::with_signals(self.config.clone(), sink, |id| factory(id))?,
            None => Column::new(self.config.clone(), sink)?,
        };
        Ok(match self.start {
            Some(start) => column.with_clock(SimulationClock::starting_at(start)),
            None => column,
        })
    }

    /// Run one scenario, forwarding its events to `sink`
    ///
    /// Placement problems abort the run; failed steps are recorded and the run
    /// continues unless the error leaves the column unusable.
    #[instrument(skip(self, scenario, sink), fields(scenario = %scenario.name, steps = scenario.steps.len()))]
    pub fn run(&self, scenario: &Scenario, sink: Box<dyn EventSink>) -> ElevatorResult<ScenarioReport> {
        info!("Running scenario {}: {}", scenario.name, scenario.description);

        let recorder = RecordingSink::new();
        let mut fanout = FanoutSink::new().with(recorder.clone());
        fanout.push(sink);
        let mut column = self.build_column(Box::new(fanout))?;

        for placement in &scenario.placements {
            column
                .place_elevator(ElevatorId::new(placement.elevator), placement.floor, placement.status)
                .map_err(|err| {
                    ElevatorError::scenario_error(format!(
                        "scenario '{}' cannot place ELV_{} at floor {}: {}",
                        scenario.name, placement.elevator, placement.floor, err
                    ))
                })?;
        }

        let mut outcomes = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            let mut outcome = StepOutcome {
                index,
                description: step.describe(),
                answered_by: None,
                expected: None,
                error: None,
            };

            let result = match *step {
                Step::Call { floor, direction, expect } => {
                    outcome.expected = expect.map(ElevatorId::new);
                    column.request_elevator(floor, direction).map(|elevator| {
                        outcome.answered_by = Some(elevator);
                    })
                }
                Step::SelectFloor { elevator, floor } => {
                    column.request_floor(ElevatorId::new(elevator), floor)
                }
                Step::Place(p) => column.place_elevator(ElevatorId::new(p.elevator), p.floor, p.status),
            };

            let fatal = match result {
                Ok(()) => false,
                Err(err) => {
                    let fatal = !err.is_recoverable();
                    outcome.error = Some(err.to_string());
                    fatal
                }
            };

            if outcome.passed() {
                debug!(step = index, "{}", outcome.description);
            } else {
                warn!(step = index, error = ?outcome.error, expected = ?outcome.expected, answered_by = ?outcome.answered_by, "Scenario step did not pass");
            }
            outcomes.push(outcome);

            if fatal {
                warn!(step = index, "Stopping scenario {} after unrecoverable error", scenario.name);
                break;
            }
        }

        column.flush_events()?;
        let report = ScenarioReport {
            name: scenario.name.clone(),
            outcomes,
            final_state: column.snapshots(),
            statistics: RunStatistics::from_events(&recorder.events()),
        };
        info!(
            "Scenario {} finished: {} of {} steps passed",
            report.name,
            report.outcomes.iter().filter(|o| o.passed()).count(),
            scenario.steps.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::sensors::ClearSignal;
    use crate::simulation::builtin_scenarios;
    use crate::types::{Direction, ElevatorStatus};

    fn orchestrator() -> ScenarioOrchestrator {
        ScenarioOrchestrator::new(ColumnConfig::residential(10, 2))
            .with_signals(|_| Box::new(ClearSignal))
    }

    #[test]
    fn test_builtin_scenarios_pass() {
        let orchestrator = orchestrator();
        for scenario in builtin_scenarios() {
            let report = orchestrator.run(&scenario, Box::new(NullSink)).unwrap();
            assert!(report.passed(), "{}", report);
        }
    }

    #[test]
    fn test_unexpected_elevator_is_a_mismatch() {
        let scenario = Scenario::new("wrong", "")
            .place(1, 2, ElevatorStatus::Idle)
            .place(2, 6, ElevatorStatus::Idle)
            .call(3, Direction::Up, Some(2));
        let report = orchestrator().run(&scenario, Box::new(NullSink)).unwrap();

        let mismatches = report.mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].answered_by, Some(ElevatorId::new(1)));
        assert!(report.to_string().contains("(expected ELV_2)"));
    }

    #[test]
    fn test_failed_step_is_recorded_and_run_continues() {
        let scenario = Scenario::new("bad floor", "")
            .select_floor(1, 42)
            .select_floor(1, 4);
        let report = orchestrator().run(&scenario, Box::new(NullSink)).unwrap();

        assert!(report.outcomes[0].error.is_some());
        assert!(report.outcomes[1].passed());
        assert_eq!(report.final_state[0].floor, 4);
    }

    #[test]
    fn test_bad_placement_aborts() {
        let scenario = Scenario::new("off the top", "")
            .place(1, 11, ElevatorStatus::Idle)
            .call(3, Direction::Up, None);
        let error = orchestrator().run(&scenario, Box::new(NullSink)).unwrap_err();
        assert!(matches!(error, ElevatorError::ScenarioError(_)));
    }

    #[test]
    fn test_report_statistics_come_from_events() {
        let scenario = &builtin_scenarios()[0];
        let report = orchestrator().run(scenario, Box::new(NullSink)).unwrap();
        // 2 -> 3 for the call, then 3 -> 7
        assert_eq!(report.statistics.floors_travelled, 5);
        assert_eq!(report.statistics.calls_registered, 1);
        assert_eq!(report.statistics.floor_requests, 1);
    }
}
