//! Elevator motion engine
//!
//! A cab sweeps in one direction toward the furthest queued stop, servicing
//! every queued floor it passes, then reverses or goes idle. All waiting
//! (floor travel, door dwell, sensor backoff) advances the simulated clock.

use chrono::Duration;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, instrument, warn};

use super::{DisplayPanel, DoorController};
use crate::column::CallClearer;
use crate::events::{EventKind, EventSink, StatusEvent};
use crate::sensors::{EnvironmentSignal, RetryPolicy, SensorThresholds};
use crate::simulation::{ElevatorError, ElevatorResult, SimulationClock};
use crate::types::{
    ButtonStatus, ColumnConfig, ColumnId, Direction, ElevatorId, ElevatorStatus, Floor,
    SensorKind, SensorStatus,
};

/// Everything a cab needs from its column while it moves
///
/// The cab never holds a reference to its column; it clears hall calls
/// through the [`CallClearer`] capability lent for the duration of one call.
pub struct MotionContext<'a> {
    /// Column the cab belongs to
    pub column_id: ColumnId,
    /// Hall call boards
    pub calls: &'a mut dyn CallClearer,
    /// Destination of status events
    pub events: &'a mut dyn EventSink,
    /// Simulated clock
    pub clock: &'a mut SimulationClock,
}

impl<'a> MotionContext<'a> {
    /// Bundle the column's collaborators
    pub fn new(
        column_id: ColumnId,
        calls: &'a mut dyn CallClearer,
        events: &'a mut dyn EventSink,
        clock: &'a mut SimulationClock,
    ) -> Self {
        Self { column_id, calls, events, clock }
    }

    /// Emit an event stamped with the current simulated time
    pub fn emit(&mut self, kind: EventKind) {
        let event = StatusEvent::new(self.clock.now(), self.column_id, kind);
        self.events.emit(event);
    }
}

impl fmt::Debug for MotionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionContext")
            .field("column_id", &self.column_id)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Point-in-time view of a cab used by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElevatorSnapshot {
    /// Elevator
    pub id: ElevatorId,
    /// Current floor
    pub floor: Floor,
    /// Motion status
    pub status: ElevatorStatus,
    /// Number of queued stops
    pub pending_stops: usize,
}

/// One cab with its doors, buttons, displays and sensors
#[derive(Debug)]
pub struct Elevator {
    id: ElevatorId,
    min_floor: Floor,
    max_floor: Floor,
    floor: Floor,
    status: ElevatorStatus,
    stop_queue: BTreeSet<Floor>,
    answered_calls: BTreeSet<(Floor, Direction)>,
    doors: DoorController,
    floor_buttons: BTreeMap<Floor, ButtonStatus>,
    displays: DisplayPanel,
    weight_sensor: SensorStatus,
    obstruction_sensor: SensorStatus,
    signal: Box<dyn EnvironmentSignal>,
    thresholds: SensorThresholds,
    retry_policy: RetryPolicy,
    door_dwell: Duration,
    floor_travel: Duration,
}

impl Elevator {
    /// Create an idle cab at the configured home floor
    pub fn new(id: ElevatorId, config: &ColumnConfig, signal: Box<dyn EnvironmentSignal>) -> Self {
        let floor = config.home_floor();
        Self {
            id,
            min_floor: config.min_floor,
            max_floor: config.max_floor,
            floor,
            status: ElevatorStatus::Idle,
            stop_queue: BTreeSet::new(),
            answered_calls: BTreeSet::new(),
            doors: DoorController::new(config.min_floor, config.max_floor),
            floor_buttons: config.floor_range().map(|f| (f, ButtonStatus::Off)).collect(),
            displays: DisplayPanel::new(config.min_floor, config.max_floor, floor),
            weight_sensor: SensorStatus::Off,
            obstruction_sensor: SensorStatus::Off,
            signal,
            thresholds: config.sensor_thresholds(),
            retry_policy: config.retry_policy(),
            door_dwell: config.door_dwell(),
            floor_travel: config.floor_travel_time(),
        }
    }

    /// Elevator identifier
    pub fn id(&self) -> ElevatorId {
        self.id
    }

    /// Current floor
    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// Motion status
    pub fn status(&self) -> ElevatorStatus {
        self.status
    }

    /// Queued stops in ascending order
    pub fn stop_queue(&self) -> Vec<Floor> {
        self.stop_queue.iter().copied().collect()
    }

    /// Whether `floor` is queued
    pub fn has_stop(&self, floor: Floor) -> bool {
        self.stop_queue.contains(&floor)
    }

    /// Doors of the cab
    pub fn doors(&self) -> &DoorController {
        &self.doors
    }

    /// Floor indicators of the cab
    pub fn displays(&self) -> &DisplayPanel {
        &self.displays
    }

    /// State of the in-cab button for `floor`
    pub fn floor_button(&self, floor: Floor) -> Option<ButtonStatus> {
        self.floor_buttons.get(&floor).copied()
    }

    /// Floors whose in-cab button is lit
    pub fn lit_floor_buttons(&self) -> Vec<Floor> {
        self.floor_buttons.iter().filter(|(_, b)| b.is_on()).map(|(f, _)| *f).collect()
    }

    /// Weight sensor state
    pub fn weight_sensor(&self) -> SensorStatus {
        self.weight_sensor
    }

    /// Obstruction sensor state
    pub fn obstruction_sensor(&self) -> SensorStatus {
        self.obstruction_sensor
    }

    /// Point-in-time view for dispatching
    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            floor: self.floor,
            status: self.status,
            pending_stops: self.stop_queue.len(),
        }
    }

    fn check_range(&self, floor: Floor) -> ElevatorResult<()> {
        if (self.min_floor..=self.max_floor).contains(&floor) {
            Ok(())
        } else {
            Err(ElevatorError::out_of_range(floor, self.min_floor, self.max_floor))
        }
    }

    /// Put the cab somewhere without moving it, for scenario setup
    pub fn place(&mut self, floor: Floor, status: ElevatorStatus) -> ElevatorResult<()> {
        self.check_range(floor)?;
        if !self.doors.all_closed() {
            return Err(ElevatorError::door_interlock_error(format!(
                "{} cannot be repositioned with open doors",
                self.id
            )));
        }
        self.floor = floor;
        self.status = status;
        self.update_display(floor);
        Ok(())
    }

    /// Swap the environment signal, returning the previous one
    pub fn replace_signal(
        &mut self,
        signal: Box<dyn EnvironmentSignal>,
    ) -> Box<dyn EnvironmentSignal> {
        std::mem::replace(&mut self.signal, signal)
    }

    /// Queue a stop without starting motion; returns false if it was already queued
    pub fn add_stop_to_queue(&mut self, floor: Floor) -> ElevatorResult<bool> {
        self.check_range(floor)?;
        Ok(self.stop_queue.insert(floor))
    }

    /// Show `floor` on every display of the cab
    pub fn update_display(&mut self, floor: Floor) {
        self.displays.update_display(floor);
    }

    /// Rider selects `floor` inside the cab
    #[instrument(skip(self, ctx), fields(elevator = %self.id))]
    pub fn request_floor(&mut self, floor: Floor, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        self.check_range(floor)?;
        self.check_weight(ctx)?;
        self.check_obstruction(ctx)?;

        if let Some(button) = self.floor_buttons.get_mut(&floor) {
            *button = ButtonStatus::On;
        }
        ctx.emit(EventKind::FloorRequested { elevator: self.id, floor });

        if self.add_stop_to_queue(floor)? {
            ctx.emit(EventKind::StopQueued { elevator: self.id, floor });
        }
        self.move_elevator(ctx)
    }

    /// Answer a hall call this cab was selected for
    ///
    /// A cab already at the call floor services it in place without queuing a stop.
    #[instrument(skip(self, ctx), fields(elevator = %self.id))]
    pub fn answer_call(
        &mut self,
        floor: Floor,
        direction: Direction,
        ctx: &mut MotionContext<'_>,
    ) -> ElevatorResult<()> {
        self.check_range(floor)?;
        if self.floor == floor {
            self.service_stop(self.status.direction(), Some(direction), ctx)?;
        } else {
            self.answered_calls.insert((floor, direction));
            if self.add_stop_to_queue(floor)? {
                ctx.emit(EventKind::StopQueued { elevator: self.id, floor });
            }
        }
        self.move_elevator(ctx)
    }

    /// Run the cab until its stop queue is empty
    pub fn move_elevator(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        loop {
            match self.status {
                ElevatorStatus::Idle => {
                    let Some(stop) = self.nearest_stop() else {
                        return Ok(());
                    };
                    match Direction::between(self.floor, stop) {
                        None => self.service_stop(None, None, ctx)?,
                        Some(direction) => self.set_status(direction.into(), ctx),
                    }
                }
                ElevatorStatus::MovingUp => self.move_up(ctx)?,
                ElevatorStatus::MovingDown => self.move_down(ctx)?,
            }
        }
    }

    fn move_up(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        self.sweep(Direction::Up, ctx)
    }

    fn move_down(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        self.sweep(Direction::Down, ctx)
    }

    fn sweep(&mut self, direction: Direction, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        if self.stop_queue.contains(&self.floor) {
            self.service_stop(Some(direction), None, ctx)?;
        }

        while self.furthest_stop(direction).is_some() {
            self.step(direction, ctx)?;
            if self.stop_queue.contains(&self.floor) {
                self.service_stop(Some(direction), None, ctx)?;
            }
        }

        if self.stop_queue.is_empty() {
            self.status = ElevatorStatus::Idle;
            debug!(elevator = %self.id, floor = self.floor, "Sweep finished, idle");
            ctx.emit(EventKind::ElevatorIdle { elevator: self.id, floor: self.floor });
        } else {
            self.set_status(direction.opposite().into(), ctx);
        }
        Ok(())
    }

    fn set_status(&mut self, status: ElevatorStatus, ctx: &mut MotionContext<'_>) {
        self.status = status;
        debug!(elevator = %self.id, floor = self.floor, %status, "Direction changed");
        ctx.emit(EventKind::DirectionChanged { elevator: self.id, floor: self.floor, status });
    }

    /// Furthest queued stop strictly ahead of the cab
    fn furthest_stop(&self, direction: Direction) -> Option<Floor> {
        match direction {
            Direction::Up => self
                .floor
                .checked_add(1)
                .and_then(|above| self.stop_queue.range(above..).next_back().copied()),
            Direction::Down => self.stop_queue.range(..self.floor).next().copied(),
        }
    }

    /// Nearest queued stop; ties go up
    fn nearest_stop(&self) -> Option<Floor> {
        let above = self.stop_queue.range(self.floor..).next().copied();
        let below = self.stop_queue.range(..self.floor).next_back().copied();
        match (above, below) {
            (Some(up), Some(down)) if up.abs_diff(self.floor) <= self.floor.abs_diff(down) => {
                Some(up)
            }
            (Some(_), Some(down)) => Some(down),
            (up, down) => up.or(down),
        }
    }

    fn step(&mut self, direction: Direction, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        self.close_door(ctx)?;

        let next = match direction {
            Direction::Up => self.floor.checked_add(1),
            Direction::Down => self.floor.checked_sub(1),
        }
        .ok_or_else(|| ElevatorError::out_of_range(self.floor, self.min_floor, self.max_floor))?;
        self.check_range(next)?;

        ctx.clock.advance_by(self.floor_travel);
        self.floor = next;
        self.update_display(next);
        debug!(elevator = %self.id, floor = next, status = %self.status, "Floor reached");
        ctx.emit(EventKind::FloorReached { elevator: self.id, floor: next, status: self.status });
        Ok(())
    }

    /// Stop-service sequence at the current floor
    ///
    /// `sweep` is the direction of travel, `None` for an idle cab. `call` names a
    /// hall call answered in place that must be cleared whatever the sweep.
    fn service_stop(
        &mut self,
        sweep: Option<Direction>,
        call: Option<Direction>,
        ctx: &mut MotionContext<'_>,
    ) -> ElevatorResult<()> {
        let floor = self.floor;
        self.stop_queue.remove(&floor);

        self.close_door(ctx)?;
        self.open_door(ctx)?;

        let mut directions = match sweep {
            Some(direction) if self.furthest_stop(direction).is_some() => vec![direction],
            // Last stop of the sweep: the cab turns or rests here
            Some(direction) => vec![direction, direction.opposite()],
            None => vec![Direction::Up, Direction::Down],
        };
        if let Some(call) = call.filter(|c| !directions.contains(c)) {
            directions.push(call);
        }
        for &direction in &directions {
            if ctx.calls.clear_call(floor, direction) {
                ctx.emit(EventKind::CallCleared { elevator: self.id, floor, direction });
            }
        }
        self.answered_calls.retain(|(f, d)| *f != floor || !directions.contains(d));
        if self.answered_calls.iter().any(|(f, _)| *f == floor) {
            // Call answered for the other direction: serve it on the way back
            self.stop_queue.insert(floor);
        }
        if let Some(button) = self.floor_buttons.get_mut(&floor) {
            *button = ButtonStatus::Off;
        }

        ctx.clock.advance_by(self.door_dwell);
        self.check_weight(ctx)?;
        self.check_obstruction(ctx)?;
        self.close_door(ctx)
    }

    /// Open the cab door and the landing door at the current floor
    pub fn open_door(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        self.doors.open(self.floor)?;
        ctx.emit(EventKind::DoorOpened { elevator: self.id, floor: self.floor });
        Ok(())
    }

    /// Close every open door, waiting while a sensor reports blocked
    pub fn close_door(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<()> {
        if self.doors.all_closed() {
            return Ok(());
        }

        while let Some(sensor) = self.blocking_sensor() {
            ctx.emit(EventKind::DoorCloseRefused { elevator: self.id, floor: self.floor, sensor });
            self.wait_for_sensor(sensor, ctx)?;
        }

        let floor = self.doors.close().unwrap_or(self.floor);
        ctx.emit(EventKind::DoorClosed { elevator: self.id, floor });
        Ok(())
    }

    fn blocking_sensor(&self) -> Option<SensorKind> {
        if self.weight_sensor.is_blocked() {
            Some(SensorKind::Weight)
        } else if self.obstruction_sensor.is_blocked() {
            Some(SensorKind::Obstruction)
        } else {
            None
        }
    }

    /// Wait until the load is under the limit; returns the number of blocked samples
    pub fn check_weight(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<u32> {
        self.wait_for_sensor(SensorKind::Weight, ctx)
    }

    /// Wait until the doorway is clear; returns the number of blocked samples
    pub fn check_obstruction(&mut self, ctx: &mut MotionContext<'_>) -> ElevatorResult<u32> {
        self.wait_for_sensor(SensorKind::Obstruction, ctx)
    }

    fn wait_for_sensor(
        &mut self,
        kind: SensorKind,
        ctx: &mut MotionContext<'_>,
    ) -> ElevatorResult<u32> {
        let policy = self.retry_policy;
        let thresholds = self.thresholds;
        let elevator = self.id;
        let floor = self.floor;
        let signal = &mut self.signal;

        let outcome = policy.run(
            || thresholds.evaluate(kind, signal.read(kind)),
            |attempt, reading, backoff| {
                let wait = match kind {
                    SensorKind::Weight => {
                        EventKind::CapacityWait { elevator, floor, attempt, reading: reading.value }
                    }
                    SensorKind::Obstruction => {
                        EventKind::ObstructionWait { elevator, floor, attempt, reading: reading.value }
                    }
                };
                ctx.emit(wait);
                if let Some(backoff) = backoff {
                    ctx.clock.advance_by(backoff);
                }
            },
        );

        let sensor = match kind {
            SensorKind::Weight => &mut self.weight_sensor,
            SensorKind::Obstruction => &mut self.obstruction_sensor,
        };
        match outcome {
            Ok(waits) => {
                *sensor = SensorStatus::Off;
                if waits > 0 {
                    ctx.emit(EventKind::SensorCleared { elevator, sensor: kind, waits });
                }
                Ok(waits)
            }
            Err(exhausted) => {
                *sensor = SensorStatus::On;
                warn!(%elevator, floor, sensor = %kind, attempts = exhausted.attempts, "Sensor stuck");
                Err(ElevatorError::SensorStuckError {
                    elevator,
                    sensor: kind,
                    attempts: exhausted.attempts,
                })
            }
        }
    }
}
