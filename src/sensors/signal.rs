//! Environment signals and the threshold function applied to them

use crate::types::{SensorKind, SensorStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;

/// Source of raw sensor readings for one cab
///
/// Weight readings are kilograms; obstruction readings are a 0-100 percentile.
pub trait EnvironmentSignal: Send + fmt::Debug {
    /// Take one sample of the given sensor
    fn read(&mut self, kind: SensorKind) -> u32;
}

/// Thresholds that decide whether a reading blocks the cab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorThresholds {
    /// Heaviest load the cab may carry
    pub max_weight_kg: u32,
    /// Obstruction readings above this value block the door
    pub obstruction_threshold: u32,
}

impl Default for SensorThresholds {
    fn default() -> Self {
        Self {
            max_weight_kg: crate::types::defaults::MAX_WEIGHT_KG,
            obstruction_threshold: crate::types::defaults::OBSTRUCTION_THRESHOLD,
        }
    }
}

/// One evaluated sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Sensor that produced the sample
    pub kind: SensorKind,
    /// Raw value
    pub value: u32,
    /// Resulting sensor state
    pub status: SensorStatus,
}

impl Reading {
    /// Whether the sample allows the cab to proceed
    pub fn is_clear(&self) -> bool {
        !self.status.is_blocked()
    }
}

impl SensorThresholds {
    /// Upper bound (inclusive) of a clear reading for the given sensor
    pub fn limit(&self, kind: SensorKind) -> u32 {
        match kind {
            SensorKind::Weight => self.max_weight_kg,
            SensorKind::Obstruction => self.obstruction_threshold,
        }
    }

    /// Pure clear/blocked decision for a raw value
    pub fn is_clear(&self, kind: SensorKind, value: u32) -> bool {
        value <= self.limit(kind)
    }

    /// Evaluate a raw value into a reading
    pub fn evaluate(&self, kind: SensorKind, value: u32) -> Reading {
        let status = if self.is_clear(kind, value) { SensorStatus::Off } else { SensorStatus::On };
        Reading { kind, value, status }
    }
}

/// Randomized signal modelled on a residential load cell and door-edge detector
///
/// A fresh sample is drawn uniformly: weight in `0..max_weight + 100`, obstruction
/// in `0..100`. While a sensor keeps reporting blocked, each follow-up sample drops
/// by a fixed step (100 kg, 30 points) so a wait always ends within a few samples.
#[derive(Debug)]
pub struct RandomSignal {
    rng: StdRng,
    thresholds: SensorThresholds,
    pending_weight: Option<u32>,
    pending_obstruction: Option<u32>,
}

/// Weight shed between consecutive blocked samples
pub const WEIGHT_STEP_KG: u32 = 100;

/// Obstruction drop between consecutive blocked samples
pub const OBSTRUCTION_STEP: u32 = 30;

impl RandomSignal {
    /// Create a signal, seeded for reproducible runs or from entropy
    pub fn new(thresholds: SensorThresholds, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, thresholds, pending_weight: None, pending_obstruction: None }
    }

    fn draw(&mut self, kind: SensorKind) -> u32 {
        match kind {
            SensorKind::Weight => {
                self.rng.gen_range(0..self.thresholds.max_weight_kg.saturating_add(WEIGHT_STEP_KG))
            }
            SensorKind::Obstruction => self.rng.gen_range(0..100),
        }
    }
}

impl EnvironmentSignal for RandomSignal {
    fn read(&mut self, kind: SensorKind) -> u32 {
        let pending = match kind {
            SensorKind::Weight => self.pending_weight.take(),
            SensorKind::Obstruction => self.pending_obstruction.take(),
        };
        let value = match pending {
            Some(value) => value,
            None => self.draw(kind),
        };

        if !self.thresholds.is_clear(kind, value) {
            match kind {
                SensorKind::Weight => {
                    self.pending_weight = Some(value.saturating_sub(WEIGHT_STEP_KG))
                }
                SensorKind::Obstruction => {
                    self.pending_obstruction = Some(value.saturating_sub(OBSTRUCTION_STEP))
                }
            }
        }
        value
    }
}

/// Signal that replays a fixed script, for tests and scenario files
///
/// Queued values are returned first; once a sensor's queue is empty it reads 0.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSignal {
    weight: VecDeque<u32>,
    obstruction: VecDeque<u32>,
}

impl ScriptedSignal {
    /// Create an always-clear script
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an overloaded cab for the next `samples` weight readings
    pub fn block_weight(mut self, samples: usize) -> Self {
        self.weight.extend(std::iter::repeat(u32::MAX).take(samples));
        self
    }

    /// Report a blocked door for the next `samples` obstruction readings
    pub fn block_obstruction(mut self, samples: usize) -> Self {
        self.obstruction.extend(std::iter::repeat(u32::MAX).take(samples));
        self
    }

    /// Append explicit raw values for a sensor
    pub fn with_readings(mut self, kind: SensorKind, values: impl IntoIterator<Item = u32>) -> Self {
        match kind {
            SensorKind::Weight => self.weight.extend(values),
            SensorKind::Obstruction => self.obstruction.extend(values),
        }
        self
    }

    /// Readings still queued for a sensor
    pub fn remaining(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Weight => self.weight.len(),
            SensorKind::Obstruction => self.obstruction.len(),
        }
    }
}

impl EnvironmentSignal for ScriptedSignal {
    fn read(&mut self, kind: SensorKind) -> u32 {
        let queue = match kind {
            SensorKind::Weight => &mut self.weight,
            SensorKind::Obstruction => &mut self.obstruction,
        };
        queue.pop_front().unwrap_or(0)
    }
}

/// Signal that never blocks
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearSignal;

impl EnvironmentSignal for ClearSignal {
    fn read(&mut self, _kind: SensorKind) -> u32 {
        0
    }
}
