//! Event sinks
//!
//! The column never prints; it hands every [`StatusEvent`] to an [`EventSink`].

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::{EventKind, StatusEvent};

/// Receiver of status events
pub trait EventSink: Send + fmt::Debug {
    /// Deliver one event
    fn emit(&mut self, event: StatusEvent);

    /// Flush buffered output, if any
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: StatusEvent) {}
}

/// Forwards events to `tracing` as structured records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: StatusEvent) {
        let column = event.column_id.0;
        let elevator = event.elevator().map(|id| id.0);
        let kind = event.kind.name();

        match &event.kind {
            EventKind::CapacityWait { .. }
            | EventKind::ObstructionWait { .. }
            | EventKind::DoorCloseRefused { .. } => {
                warn!(column, elevator, event = kind, "{}", event.kind)
            }
            EventKind::FloorReached { .. } | EventKind::StopQueued { .. } => {
                debug!(column, elevator, event = kind, "{}", event.kind)
            }
            _ => info!(column, elevator, event = kind, "{}", event.kind),
        }
    }
}

/// Keeps every event in a shared buffer
///
/// Clones share the same buffer, so a test can keep one handle while the
/// column owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StatusEvent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StatusEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of every event recorded so far
    pub fn events(&self) -> Vec<StatusEvent> {
        self.lock().clone()
    }

    /// Payloads of every event recorded so far
    pub fn kinds(&self) -> Vec<EventKind> {
        self.lock().iter().map(|event| event.kind.clone()).collect()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every recorded event
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Remove and return every recorded event
    pub fn drain(&self) -> Vec<StatusEvent> {
        std::mem::take(&mut *self.lock())
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: StatusEvent) {
        self.lock().push(event);
    }
}

/// Writes one JSON object per line to any writer
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    written: u64,
    failures: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, failures: 0 }
    }

    /// Lines written successfully
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Events that could not be written
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &StatusEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write + Send> fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("written", &self.written)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: StatusEvent) {
        match self.write_event(&event) {
            Ok(()) => self.written += 1,
            Err(error) => {
                self.failures += 1;
                warn!(event = event.kind.name(), %error, "Failed to write status event");
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Delivers every event to several sinks in order
#[derive(Debug, Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    /// Create an empty fanout
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Add a boxed sink
    pub fn push(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Number of downstream sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no downstream sinks
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&mut self, event: StatusEvent) {
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
