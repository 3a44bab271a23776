//! A column of elevators sharing one floor range
//!
//! The column is the single owner of its cabs, its call boards, its event sink
//! and its clock. Every request runs to completion before the next one is
//! accepted, so each dispatch decision sees a consistent snapshot.

use tracing::{debug, error, info, instrument};

use super::{select_elevator, CallBoard, Selection};
use crate::elevator::{Elevator, ElevatorSnapshot, MotionContext};
use crate::events::{EventKind, EventSink, StatusEvent};
use crate::sensors::{EnvironmentSignal, RandomSignal};
use crate::simulation::{ElevatorError, ElevatorResult, SimulationClock};
use crate::types::{
    ColumnConfig, ColumnId, ColumnStatus, Direction, ElevatorId, ElevatorStatus, Floor,
};

/// A column of elevators
#[derive(Debug)]
pub struct Column {
    id: ColumnId,
    status: ColumnStatus,
    config: ColumnConfig,
    elevators: Vec<Elevator>,
    call_board: CallBoard,
    sink: Box<dyn EventSink>,
    clock: SimulationClock,
}

impl Column {
    /// Build a column whose cabs sample randomized sensors
    ///
    /// With a configured seed, cab `n` uses `seed + n` so runs are reproducible.
    pub fn new(config: ColumnConfig, sink: Box<dyn EventSink>) -> ElevatorResult<Self> {
        let thresholds = config.sensor_thresholds();
        let seed = config.seed;
        Self::with_signals(config, sink, |id| {
            let cab_seed = seed.map(|seed| seed.wrapping_add(u64::from(id.0)));
            Box::new(RandomSignal::new(thresholds, cab_seed))
        })
    }

    /// Build a column with one caller-supplied signal per cab
    #[instrument(skip_all, fields(column_id = config.column_id, elevators = config.elevator_count))]
    pub fn with_signals<F>(
        config: ColumnConfig,
        sink: Box<dyn EventSink>,
        mut signal_for: F,
    ) -> ElevatorResult<Self>
    where
        F: FnMut(ElevatorId) -> Box<dyn EnvironmentSignal>,
    {
        config.validate()?;

        let elevator_count = u32::try_from(config.elevator_count).map_err(|_| {
            ElevatorError::configuration_error(format!(
                "elevator count {} does not fit an elevator id",
                config.elevator_count
            ))
        })?;
        let elevators: Vec<Elevator> = (1..=elevator_count)
            .map(ElevatorId::new)
            .map(|id| Elevator::new(id, &config, signal_for(id)))
            .collect();

        let mut column = Self {
            id: ColumnId::new(config.column_id),
            status: config.column_status,
            call_board: CallBoard::new(config.min_floor, config.max_floor),
            elevators,
            sink,
            clock: SimulationClock::new(),
            config,
        };

        info!(
            "Column {} created ({}) serving floors {} to {} with {} elevators",
            column.id,
            column.status,
            column.config.min_floor,
            column.config.max_floor,
            column.elevators.len()
        );
        column.emit(EventKind::ColumnCreated {
            status: column.status,
            min_floor: column.config.min_floor,
            max_floor: column.config.max_floor,
            elevator_count: column.elevators.len(),
        });
        for index in 0..column.elevators.len() {
            let (elevator, floor) = (column.elevators[index].id(), column.elevators[index].floor());
            column.emit(EventKind::ElevatorCreated { elevator, floor });
        }

        Ok(column)
    }

    /// Replace the clock, e.g. to start at a fixed instant
    pub fn with_clock(mut self, clock: SimulationClock) -> Self {
        self.clock = clock;
        self
    }

    fn emit(&mut self, kind: EventKind) {
        let event = StatusEvent::new(self.clock.now(), self.id, kind);
        self.sink.emit(event);
    }

    fn ensure_active(&self) -> ElevatorResult<()> {
        match self.status {
            ColumnStatus::Active => Ok(()),
            ColumnStatus::Inactive => Err(ElevatorError::ColumnInactiveError(self.id)),
        }
    }

    fn index_of(&self, elevator_id: ElevatorId) -> ElevatorResult<usize> {
        self.elevators
            .iter()
            .position(|elevator| elevator.id() == elevator_id)
            .ok_or(ElevatorError::UnknownElevatorError(elevator_id))
    }

    /// Run `f` against one cab with the column's collaborators lent to it
    fn drive<T>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Elevator, &mut MotionContext<'_>) -> ElevatorResult<T>,
    ) -> ElevatorResult<T> {
        let elevator = self
            .elevators
            .get_mut(index)
            .ok_or_else(|| ElevatorError::dispatch_error(format!("no elevator at index {}", index)))?;
        let mut ctx =
            MotionContext::new(self.id, &mut self.call_board, &mut *self.sink, &mut self.clock);
        f(elevator, &mut ctx)
    }

    /// Rider outside the cab calls an elevator to `floor` going `direction`
    ///
    /// Returns the elevator that answered.
    #[instrument(skip(self), fields(column = %self.id))]
    pub fn request_elevator(
        &mut self,
        floor: Floor,
        direction: Direction,
    ) -> ElevatorResult<ElevatorId> {
        self.ensure_active()?;
        self.call_board.request_call(floor, direction)?;
        self.emit(EventKind::CallRegistered { floor, direction });

        let snapshots = self.snapshots();
        let Selection { elevator_id, index, tier, distance } =
            select_elevator(floor, direction, &snapshots)?;
        info!("{} called to floor {} going {} ({} tier)", elevator_id, floor, direction, tier);
        self.emit(EventKind::ElevatorCalled { elevator: elevator_id, floor, direction, tier, distance });

        self.drive(index, |elevator, ctx| elevator.answer_call(floor, direction, ctx)).map_err(
            |err| {
                error!(%elevator_id, floor, %err, "Call could not be completed");
                err
            },
        )?;
        Ok(elevator_id)
    }

    /// Rider inside `elevator_id` selects `floor`
    #[instrument(skip(self), fields(column = %self.id))]
    pub fn request_floor(&mut self, elevator_id: ElevatorId, floor: Floor) -> ElevatorResult<()> {
        self.ensure_active()?;
        let index = self.index_of(elevator_id)?;
        self.drive(index, |elevator, ctx| elevator.request_floor(floor, ctx)).map_err(|err| {
            error!(%elevator_id, floor, %err, "Floor request could not be completed");
            err
        })
    }

    /// Reposition a cab without moving it, for scenario setup
    pub fn place_elevator(
        &mut self,
        elevator_id: ElevatorId,
        floor: Floor,
        status: ElevatorStatus,
    ) -> ElevatorResult<()> {
        let index = self.index_of(elevator_id)?;
        self.elevators[index].place(floor, status)?;
        debug!(%elevator_id, floor, %status, "Elevator placed");
        Ok(())
    }

    /// Swap a cab's environment signal, returning the previous one
    pub fn replace_signal(
        &mut self,
        elevator_id: ElevatorId,
        signal: Box<dyn EnvironmentSignal>,
    ) -> ElevatorResult<Box<dyn EnvironmentSignal>> {
        let index = self.index_of(elevator_id)?;
        Ok(self.elevators[index].replace_signal(signal))
    }

    /// Take the column in or out of service
    pub fn set_status(&mut self, status: ColumnStatus) {
        info!("Column {} is now {}", self.id, status);
        self.status = status;
    }

    /// Point-in-time view of every cab, in elevator order
    pub fn snapshots(&self) -> Vec<ElevatorSnapshot> {
        self.elevators.iter().map(Elevator::snapshot).collect()
    }

    /// Column identifier
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Operational status
    pub fn status(&self) -> ColumnStatus {
        self.status
    }

    /// Configuration the column was built from
    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// All cabs
    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    /// One cab by id
    pub fn elevator(&self, elevator_id: ElevatorId) -> ElevatorResult<&Elevator> {
        self.index_of(elevator_id).map(|index| &self.elevators[index])
    }

    /// Hall call boards
    pub fn call_board(&self) -> &CallBoard {
        &self.call_board
    }

    /// Simulated clock
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Flush the event sink
    pub fn flush_events(&mut self) -> ElevatorResult<()> {
        Ok(self.sink.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::sensors::ClearSignal;
    use crate::types::DispatchTier;

    fn column(config: ColumnConfig) -> (Column, RecordingSink) {
        let sink = RecordingSink::new();
        let column =
            Column::with_signals(config, Box::new(sink.clone()), |_| Box::new(ClearSignal)).unwrap();
        (column, sink)
    }

    #[test]
    fn test_construction_emits_created_events() {
        let (column, sink) = column(ColumnConfig::residential(10, 2));
        assert_eq!(column.elevators().len(), 2);
        assert_eq!(column.id(), ColumnId::new(1));

        let kinds = sink.kinds();
        assert!(matches!(kinds[0], EventKind::ColumnCreated { elevator_count: 2, .. }));
        assert_eq!(kinds[1], EventKind::ElevatorCreated { elevator: ElevatorId::new(1), floor: 1 });
        assert_eq!(kinds[2], EventKind::ElevatorCreated { elevator: ElevatorId::new(2), floor: 1 });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ColumnConfig { elevator_count: 0, ..Default::default() };
        let result = Column::new(config, Box::new(RecordingSink::new()));
        assert!(matches!(result, Err(ElevatorError::ConfigurationError(_))));

        let config = ColumnConfig { elevator_count: usize::MAX, ..Default::default() };
        let result = Column::new(config, Box::new(RecordingSink::new()));
        assert!(matches!(result, Err(ElevatorError::ConfigurationError(_))));

        // Rejected before any per-floor state is allocated
        let config = ColumnConfig {
            min_floor: -1_000_000_000,
            max_floor: 1_000_000_000,
            ..Default::default()
        };
        let result = Column::new(config, Box::new(RecordingSink::new()));
        assert!(matches!(result, Err(ElevatorError::ConfigurationError(_))));
    }

    #[test]
    fn test_request_elevator_moves_nearest_cab() {
        let (mut column, sink) = column(ColumnConfig::residential(10, 2));
        column.place_elevator(ElevatorId::new(1), 2, ElevatorStatus::Idle).unwrap();
        column.place_elevator(ElevatorId::new(2), 6, ElevatorStatus::Idle).unwrap();

        let chosen = column.request_elevator(3, Direction::Up).unwrap();
        assert_eq!(chosen, ElevatorId::new(1));
        assert_eq!(column.elevator(chosen).unwrap().floor(), 3);
        assert_eq!(column.elevator(ElevatorId::new(2)).unwrap().floor(), 6);
        assert!(!column.call_board().is_active(3, Direction::Up));

        let called = sink.kinds().into_iter().find_map(|kind| match kind {
            EventKind::ElevatorCalled { tier, distance, .. } => Some((tier, distance)),
            _ => None,
        });
        assert_eq!(called, Some((DispatchTier::Idle, 1)));
    }

    #[test]
    fn test_cab_at_call_floor_answers_in_place() {
        let (mut column, sink) = column(ColumnConfig::residential(10, 1));
        column.place_elevator(ElevatorId::new(1), 4, ElevatorStatus::Idle).unwrap();
        sink.clear();

        column.request_elevator(4, Direction::Down).unwrap();
        let kinds = sink.kinds();
        assert!(!kinds.iter().any(|k| matches!(k, EventKind::StopQueued { .. })));
        assert!(kinds.iter().any(|k| matches!(k, EventKind::DoorOpened { floor: 4, .. })));
        assert!(kinds.iter().any(|k| matches!(
            k,
            EventKind::CallCleared { floor: 4, direction: Direction::Down, .. }
        )));
        assert!(!column.call_board().is_active(4, Direction::Down));
    }

    #[test]
    fn test_out_of_range_call_is_surfaced() {
        let (mut column, _) = column(ColumnConfig::residential(10, 2));
        assert!(matches!(
            column.request_elevator(10, Direction::Up),
            Err(ElevatorError::OutOfRangeError { .. })
        ));
        assert!(matches!(
            column.request_floor(ElevatorId::new(1), 0),
            Err(ElevatorError::OutOfRangeError { .. })
        ));
    }

    #[test]
    fn test_unknown_elevator_is_rejected() {
        let (mut column, _) = column(ColumnConfig::residential(10, 2));
        assert!(matches!(
            column.request_floor(ElevatorId::new(3), 5),
            Err(ElevatorError::UnknownElevatorError(_))
        ));
    }

    #[test]
    fn test_inactive_column_rejects_requests() {
        let config = ColumnConfig { column_status: ColumnStatus::Inactive, ..Default::default() };
        let (mut column, _) = column(config);
        assert!(matches!(
            column.request_elevator(3, Direction::Up),
            Err(ElevatorError::ColumnInactiveError(_))
        ));

        column.set_status(ColumnStatus::Active);
        assert!(column.request_elevator(3, Direction::Up).is_ok());
    }

    #[test]
    fn test_seeded_columns_are_reproducible() {
        let config = ColumnConfig { seed: Some(99), ..Default::default() };
        let run = || {
            let sink = RecordingSink::new();
            let mut column = Column::new(config.clone(), Box::new(sink.clone())).unwrap();
            column.request_elevator(6, Direction::Down).unwrap();
            column.request_floor(ElevatorId::new(1), 2).unwrap();
            sink.kinds()
        };
        assert_eq!(run(), run());
    }
}
