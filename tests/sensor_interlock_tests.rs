//! Tests for the weight and obstruction interlocks
//!
//! Sensors are scripted so each test controls exactly how many blocked
//! samples a cab sees before the doors may close.

use elevator_column_simulator::column::{CallBoard, Column};
use elevator_column_simulator::elevator::{Elevator, MotionContext};
use elevator_column_simulator::events::{EventKind, RecordingSink};
use elevator_column_simulator::sensors::{
    ClearSignal, EnvironmentSignal, RandomSignal, ScriptedSignal,
};
use elevator_column_simulator::simulation::{ElevatorError, SimulationClock};
use elevator_column_simulator::types::{
    ColumnConfig, ColumnId, ElevatorId, SensorKind, SensorStatus,
};

fn scripted_column(config: ColumnConfig, script: ScriptedSignal) -> (Column, RecordingSink) {
    let sink = RecordingSink::new();
    let signal_for = move |id: ElevatorId| -> Box<dyn EnvironmentSignal> {
        if id == ElevatorId::new(1) {
            Box::new(script.clone())
        } else {
            Box::new(ClearSignal)
        }
    };
    let column = Column::with_signals(config, Box::new(sink.clone()), signal_for).unwrap();
    (column, sink)
}

/// Weight blocked for two samples: two capacity waits, then the cab departs
#[test]
fn test_overweight_cab_waits_then_departs() {
    let (mut column, sink) =
        scripted_column(ColumnConfig::residential(10, 2), ScriptedSignal::new().block_weight(2));
    column.request_floor(ElevatorId::new(1), 3).unwrap();

    let kinds = sink.kinds();
    let first_move = kinds
        .iter()
        .position(|k| matches!(k, EventKind::FloorReached { .. }))
        .unwrap();
    let waits_before: Vec<u32> = kinds[..first_move]
        .iter()
        .filter_map(|k| match k {
            EventKind::CapacityWait { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .collect();
    assert_eq!(waits_before, vec![1, 2]);

    let total_waits = kinds.iter().filter(|k| matches!(k, EventKind::CapacityWait { .. })).count();
    assert_eq!(total_waits, 2);
    assert!(kinds[..first_move].iter().any(|k| matches!(
        k,
        EventKind::SensorCleared { sensor: SensorKind::Weight, waits: 2, .. }
    )));

    let cab = column.elevator(ElevatorId::new(1)).unwrap();
    assert_eq!(cab.floor(), 3);
    assert_eq!(cab.weight_sensor(), SensorStatus::Off);
}

/// Backoff waits land on the simulated clock: 250 ms then 500 ms
#[test]
fn test_backoff_advances_simulated_clock() {
    let (mut column, _sink) =
        scripted_column(ColumnConfig::residential(10, 1), ScriptedSignal::new().block_weight(2));
    column.request_floor(ElevatorId::new(1), 3).unwrap();

    // two floors of travel, one dwell, two backoffs
    assert_eq!(column.clock().elapsed(), chrono::Duration::milliseconds(4_000 + 1_000 + 750));
}

/// An obstruction that never clears fails the request without moving the cab
#[test]
fn test_stuck_obstruction_sensor_fails_request() {
    let config = ColumnConfig { sensor_max_retries: 3, ..ColumnConfig::residential(10, 1) };
    let (mut column, sink) = scripted_column(config, ScriptedSignal::new().block_obstruction(10));

    let error = column.request_floor(ElevatorId::new(1), 5).unwrap_err();
    assert!(matches!(
        error,
        ElevatorError::SensorStuckError { sensor: SensorKind::Obstruction, attempts: 4, .. }
    ));
    assert_eq!(error.category(), "Sensor");

    let cab = column.elevator(ElevatorId::new(1)).unwrap();
    assert_eq!(cab.floor(), 1);
    assert_eq!(cab.obstruction_sensor(), SensorStatus::On);
    assert!(cab.stop_queue().is_empty());
    assert!(cab.lit_floor_buttons().is_empty());

    let waits = sink.kinds().iter().filter(|k| matches!(k, EventKind::ObstructionWait { .. })).count();
    assert_eq!(waits, 4);
    assert!(!sink.kinds().iter().any(|k| matches!(k, EventKind::FloorReached { .. })));
}

/// A sensor stuck while the doors are open blocks the next close attempt
#[test]
fn test_door_close_refused_while_sensor_blocked() {
    let config = ColumnConfig { sensor_max_retries: 3, ..ColumnConfig::residential(10, 1) };
    let script = ScriptedSignal::new()
        .with_readings(SensorKind::Weight, [0, u32::MAX, u32::MAX, u32::MAX, u32::MAX]);
    let mut calls = CallBoard::new(1, 10);
    let mut sink = RecordingSink::new();
    let mut clock = SimulationClock::from_epoch();
    let mut cab = Elevator::new(ElevatorId::new(1), &config, Box::new(script));
    let mut ctx = MotionContext::new(ColumnId::new(1), &mut calls, &mut sink, &mut clock);

    // Clear at departure, overloaded at the stop
    let error = cab.request_floor(2, &mut ctx).unwrap_err();
    assert!(matches!(error, ElevatorError::SensorStuckError { sensor: SensorKind::Weight, .. }));
    assert_eq!(cab.floor(), 2);
    assert!(!cab.doors().all_closed());
    assert_eq!(cab.weight_sensor(), SensorStatus::On);

    // Script exhausted, so the sensor now reads clear
    cab.close_door(&mut ctx).unwrap();
    assert!(cab.doors().all_closed());
    assert_eq!(cab.weight_sensor(), SensorStatus::Off);

    let kinds = sink.kinds();
    let refused = kinds
        .iter()
        .position(|k| matches!(k, EventKind::DoorCloseRefused { sensor: SensorKind::Weight, .. }))
        .unwrap();
    assert!(matches!(kinds.last(), Some(EventKind::DoorClosed { floor: 2, .. })));
    assert!(refused < kinds.len() - 1);
}

/// The cab cannot be repositioned while a landing door is open
#[test]
fn test_open_doors_block_placement() {
    let config = ColumnConfig { sensor_max_retries: 0, ..ColumnConfig::residential(10, 1) };
    let script = ScriptedSignal::new().with_readings(SensorKind::Obstruction, [0, 100]);
    let mut calls = CallBoard::new(1, 10);
    let mut sink = RecordingSink::new();
    let mut clock = SimulationClock::from_epoch();
    let mut cab = Elevator::new(ElevatorId::new(1), &config, Box::new(script));
    let mut ctx = MotionContext::new(ColumnId::new(1), &mut calls, &mut sink, &mut clock);

    assert!(cab.request_floor(4, &mut ctx).is_err());
    let error = cab.place(7, cab.status()).unwrap_err();
    assert!(matches!(error, ElevatorError::DoorInterlockError(_)));
    assert_eq!(error.category(), "Door Interlock");
}

/// Randomized sensors always settle under the default limits
#[test]
fn test_random_signal_never_sticks_with_defaults() {
    let config = ColumnConfig { seed: Some(99), ..ColumnConfig::residential(10, 2) };
    let thresholds = config.sensor_thresholds();
    let sink = RecordingSink::new();
    let mut column = Column::with_signals(config, Box::new(sink.clone()), |id| {
        Box::new(RandomSignal::new(thresholds, Some(u64::from(id.0))))
    })
    .unwrap();

    for floor in [10, 1, 7, 2, 9, 4] {
        column.request_floor(ElevatorId::new(1), floor).unwrap();
        column.request_floor(ElevatorId::new(2), 11 - floor).unwrap();
    }

    for kind in sink.kinds() {
        if let EventKind::SensorCleared { waits, .. } = kind {
            assert!(waits <= 1);
        }
    }
}
