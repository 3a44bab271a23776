//! Column service thread
//!
//! Moves a [`Column`] onto its own thread. Callers on any thread talk to it
//! through a cloneable [`ColumnHandle`]; commands are processed one at a time
//! in arrival order, so the column keeps its single-owner guarantees.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, instrument};

use crate::column::Column;
use crate::elevator::ElevatorSnapshot;
use crate::simulation::{ElevatorError, ElevatorResult};
use crate::types::{ColumnId, Direction, ElevatorId, Floor};

enum Command {
    RequestElevator {
        floor: Floor,
        direction: Direction,
        reply: Sender<ElevatorResult<ElevatorId>>,
    },
    RequestFloor {
        elevator: ElevatorId,
        floor: Floor,
        reply: Sender<ElevatorResult<()>>,
    },
    Snapshot {
        reply: Sender<Vec<ElevatorSnapshot>>,
    },
    Shutdown,
}

/// Cloneable client for a running column service
#[derive(Debug, Clone)]
pub struct ColumnHandle {
    column_id: ColumnId,
    commands: Sender<Command>,
}

impl ColumnHandle {
    fn call<T>(&self, build: impl FnOnce(Sender<T>) -> Command) -> ElevatorResult<T> {
        let (reply, response) = bounded(1);
        self.commands.send(build(reply)).map_err(|_| {
            ElevatorError::service_unavailable(format!("column {} has shut down", self.column_id))
        })?;
        response.recv().map_err(|_| {
            ElevatorError::service_unavailable(format!(
                "column {} stopped before replying",
                self.column_id
            ))
        })
    }

    /// Column served by this handle
    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Hall call; blocks until the answering cab has serviced it
    pub fn request_elevator(&self, floor: Floor, direction: Direction) -> ElevatorResult<ElevatorId> {
        self.call(|reply| Command::RequestElevator { floor, direction, reply })?
    }

    /// In-cab floor selection; blocks until the cab has arrived
    pub fn request_floor(&self, elevator: ElevatorId, floor: Floor) -> ElevatorResult<()> {
        self.call(|reply| Command::RequestFloor { elevator, floor, reply })?
    }

    /// Current state of every cab
    pub fn snapshots(&self) -> ElevatorResult<Vec<ElevatorSnapshot>> {
        self.call(|reply| Command::Snapshot { reply })
    }
}

/// A column running on a dedicated thread
#[derive(Debug)]
pub struct ColumnService {
    handle: ColumnHandle,
    worker: JoinHandle<Column>,
}

impl ColumnService {
    /// Start serving `column`
    #[instrument(skip(column), fields(column = %column.id()))]
    pub fn spawn(column: Column) -> ElevatorResult<Self> {
        let column_id = column.id();
        let (commands, inbox) = unbounded();
        let worker = thread::Builder::new()
            .name(format!("column-{}", column_id.0))
            .spawn(move || serve(column, inbox))?;
        info!("Column service {} started", column_id);
        Ok(Self { handle: ColumnHandle { column_id, commands }, worker })
    }

    /// A new client handle
    pub fn handle(&self) -> ColumnHandle {
        self.handle.clone()
    }

    /// Stop after the commands already queued and return the column
    pub fn shutdown(self) -> ElevatorResult<Column> {
        let column_id = self.handle.column_id;
        // Already stopped if the send fails; join reports how
        let _ = self.handle.commands.send(Command::Shutdown);
        let column = self.worker.join().map_err(|_| {
            ElevatorError::service_unavailable(format!("column {} worker panicked", column_id))
        })?;
        info!("Column service {} stopped", column_id);
        Ok(column)
    }
}

fn serve(mut column: Column, inbox: Receiver<Command>) -> Column {
    for command in inbox.iter() {
        match command {
            Command::RequestElevator { floor, direction, reply } => {
                let _ = reply.send(column.request_elevator(floor, direction));
            }
            Command::RequestFloor { elevator, floor, reply } => {
                let _ = reply.send(column.request_floor(elevator, floor));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(column.snapshots());
            }
            Command::Shutdown => break,
        }
    }
    if let Err(err) = column.flush_events() {
        debug!(%err, "Event sink flush failed on shutdown");
    }
    column
}
