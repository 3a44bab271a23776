//! Configuration structures for the elevator column simulator
//!
//! This module contains the column configuration structure, its file and CLI
//! layers, and the validation logic that guards column construction.

use super::{ColumnStatus, Floor};
use crate::sensors::{RetryPolicy, SensorThresholds};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Defaults taken from the residential controller this simulator models
pub mod defaults {
    /// Seconds the doors stay open before closing
    pub const DOOR_DWELL_SECONDS: u64 = 1;

    /// Seconds a cab needs to travel one floor
    pub const FLOOR_TRAVEL_SECONDS: u64 = 2;

    /// Maximum load a cab can carry, in kilograms
    pub const MAX_WEIGHT_KG: u32 = 500;

    /// Obstruction readings above this percentile mean something blocks the door
    pub const OBSTRUCTION_THRESHOLD: u32 = 70;

    /// Sensor re-samples allowed before a sensor is reported stuck
    pub const SENSOR_MAX_RETRIES: u32 = 5;

    /// First backoff between sensor samples, in milliseconds
    pub const SENSOR_BACKOFF_MS: u64 = 250;

    /// Backoff growth factor between consecutive samples
    pub const SENSOR_BACKOFF_MULTIPLIER: f64 = 2.0;

    /// Backoff ceiling, in milliseconds
    pub const SENSOR_MAX_BACKOFF_MS: u64 = 4_000;
}

/// Largest number of floors a column may serve
pub const MAX_FLOOR_COUNT: usize = 1_000;

/// Largest number of cabs in one column
pub const MAX_ELEVATOR_COUNT: usize = 100;

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "elevator-column-simulator",
    version = "0.1.0",
    about = "Elevator Column Simulator - dispatch and motion control for a bank of elevators",
    long_about = "Simulates a column of elevators: hall calls are dispatched to the best cab, cabs sweep through their stop queues, and doors cycle under weight and obstruction interlocks.

EXAMPLES:
    # Run every built-in scenario with default settings
    elevator-column-simulator

    # Run one built-in scenario
    elevator-column-simulator --scenario scenario2

    # Run a scenario described in a JSON file
    elevator-column-simulator --scenario my-scenario.json

    # Use a configuration file and override the elevator count
    elevator-column-simulator --config column.json --elevator-count 4

    # Generate configuration template
    elevator-column-simulator --print-config > column.json

    # Write every status event as JSON lines
    elevator-column-simulator --events-output events.jsonl

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Column identifier
    #[arg(long, help = "Column identifier (starts at 1)")]
    pub column_id: Option<u32>,

    /// Lowest floor served by the column
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Lowest served floor (negative for basements)"
    )]
    pub min_floor: Option<Floor>,

    /// Highest floor served by the column
    #[arg(long, allow_negative_numbers = true, help = "Highest served floor")]
    pub max_floor: Option<Floor>,

    /// Number of elevators in the column
    #[arg(
        long,
        help = "Number of elevators",
        long_help = "Number of elevators in the column. Must be greater than 0. Default: 2"
    )]
    pub elevator_count: Option<usize>,

    /// Floor every cab starts on
    #[arg(long, allow_negative_numbers = true, help = "Floor every cab starts on")]
    pub starting_floor: Option<Floor>,

    /// Seconds the doors stay open
    #[arg(long, help = "Door dwell time in seconds")]
    pub door_dwell_seconds: Option<u64>,

    /// Seconds to travel one floor
    #[arg(long, help = "Travel time per floor in seconds")]
    pub floor_travel_seconds: Option<u64>,

    /// Maximum load in kilograms
    #[arg(long, help = "Maximum cab load in kilograms")]
    pub max_weight_kg: Option<u32>,

    /// Obstruction percentile threshold
    #[arg(long, help = "Obstruction threshold (0-100)")]
    pub obstruction_threshold: Option<u32>,

    /// Sensor retries before reporting a stuck sensor
    #[arg(long, help = "Maximum sensor retries")]
    pub sensor_max_retries: Option<u32>,

    /// Initial sensor backoff in milliseconds
    #[arg(long, help = "Initial sensor backoff in milliseconds")]
    pub sensor_backoff_ms: Option<u64>,

    /// Random seed for reproducible sensor readings
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Scenario to run
    #[arg(
        short,
        long,
        default_value = "all",
        help = "Scenario name, JSON file, or 'all'",
        long_help = "Name of a built-in scenario (see --list-scenarios), a path to a JSON scenario file, or 'all' to run every built-in scenario. Default: all"
    )]
    pub scenario: String,

    /// Output path for status events
    #[arg(long, help = "Write status events to a JSON lines file")]
    pub events_output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running scenarios
    #[arg(long, help = "Validate configuration without running scenarios")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// List built-in scenarios and exit
    #[arg(long, help = "List built-in scenarios and exit")]
    pub list_scenarios: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Column identifier
    pub column_id: Option<u32>,
    /// Operational status of the column
    pub column_status: Option<ColumnStatus>,
    /// Lowest served floor
    pub min_floor: Option<Floor>,
    /// Highest served floor
    pub max_floor: Option<Floor>,
    /// Number of elevators
    pub elevator_count: Option<usize>,
    /// Floor every cab starts on
    pub starting_floor: Option<Floor>,
    /// Door dwell time in seconds
    pub door_dwell_seconds: Option<u64>,
    /// Travel time per floor in seconds
    pub floor_travel_seconds: Option<u64>,
    /// Maximum cab load in kilograms
    pub max_weight_kg: Option<u32>,
    /// Obstruction threshold percentile
    pub obstruction_threshold: Option<u32>,
    /// Maximum sensor retries
    pub sensor_max_retries: Option<u32>,
    /// Initial sensor backoff in milliseconds
    pub sensor_backoff_ms: Option<u64>,
    /// Sensor backoff growth factor
    pub sensor_backoff_multiplier: Option<f64>,
    /// Sensor backoff ceiling in milliseconds
    pub sensor_max_backoff_ms: Option<u64>,
    /// Random seed
    pub seed: Option<u64>,
}

/// Configuration for one column of elevators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column identifier (starts at 1)
    pub column_id: u32,

    /// Operational status of the column
    pub column_status: ColumnStatus,

    /// Lowest served floor (negative for basements)
    pub min_floor: Floor,

    /// Highest served floor
    pub max_floor: Floor,

    /// Number of elevators in the column
    pub elevator_count: usize,

    /// Floor every cab starts on (defaults to the lowest served floor)
    pub starting_floor: Option<Floor>,

    /// Seconds the doors stay open before closing
    pub door_dwell_seconds: u64,

    /// Seconds a cab needs to travel one floor
    pub floor_travel_seconds: u64,

    /// Maximum cab load in kilograms
    pub max_weight_kg: u32,

    /// Obstruction readings above this percentile block the door (0-100)
    pub obstruction_threshold: u32,

    /// Sensor re-samples allowed before a sensor is reported stuck
    pub sensor_max_retries: u32,

    /// First backoff between sensor samples, in milliseconds
    pub sensor_backoff_ms: u64,

    /// Backoff growth factor between consecutive samples
    pub sensor_backoff_multiplier: f64,

    /// Backoff ceiling, in milliseconds
    pub sensor_max_backoff_ms: u64,

    /// Random seed for reproducible sensor readings
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for column configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Column identifier is invalid
    #[error("Column id must be greater than 0, got {0}")]
    InvalidColumnId(u32),

    /// Floor range is invalid
    #[error("Invalid floor range: min ({0}) must be < max ({1})")]
    InvalidFloorRange(Floor, Floor),

    /// Elevator count is invalid
    #[error("Elevator count must be greater than 0, got {0}")]
    InvalidElevatorCount(usize),

    /// Floor range spans more floors than a column can serve
    #[error("Column serves {count} floors, at most {max} are supported")]
    TooManyFloors {
        /// Floors in the configured range
        count: usize,
        /// Supported maximum
        max: usize,
    },

    /// More cabs than a column can hold
    #[error("Column has {count} elevators, at most {max} are supported")]
    TooManyElevators {
        /// Configured elevator count
        count: usize,
        /// Supported maximum
        max: usize,
    },

    /// Starting floor lies outside the served range
    #[error("Starting floor {floor} is outside the served range [{min_floor}, {max_floor}]")]
    StartingFloorOutOfRange {
        /// The rejected starting floor
        floor: Floor,
        /// Lowest served floor
        min_floor: Floor,
        /// Highest served floor
        max_floor: Floor,
    },

    /// Maximum weight is invalid
    #[error("Maximum weight must be greater than 0 kg, got {0}")]
    InvalidMaxWeight(u32),

    /// Obstruction threshold is out of range
    #[error("Obstruction threshold must be between 0 and 100, got {0}")]
    InvalidObstructionThreshold(u32),

    /// Backoff multiplier is invalid
    #[error("Sensor backoff multiplier must be a finite value >= 1.0, got {0}")]
    InvalidBackoffMultiplier(f64),

    /// Backoff bounds are inverted
    #[error("Invalid sensor backoff: initial ({initial_ms} ms) must be <= max ({max_ms} ms)")]
    InvalidBackoffRange {
        /// Initial backoff in milliseconds
        initial_ms: u64,
        /// Backoff ceiling in milliseconds
        max_ms: u64,
    },
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            column_id: 1,
            column_status: ColumnStatus::Active,
            min_floor: 1,
            max_floor: 10,
            elevator_count: 2,
            starting_floor: None,
            door_dwell_seconds: defaults::DOOR_DWELL_SECONDS,
            floor_travel_seconds: defaults::FLOOR_TRAVEL_SECONDS,
            max_weight_kg: defaults::MAX_WEIGHT_KG,
            obstruction_threshold: defaults::OBSTRUCTION_THRESHOLD,
            sensor_max_retries: defaults::SENSOR_MAX_RETRIES,
            sensor_backoff_ms: defaults::SENSOR_BACKOFF_MS,
            sensor_backoff_multiplier: defaults::SENSOR_BACKOFF_MULTIPLIER,
            sensor_max_backoff_ms: defaults::SENSOR_MAX_BACKOFF_MS,
            seed: None,
        }
    }
}

impl ColumnConfig {
    /// Configuration for a residential column serving floors `1..=floor_count`
    pub fn residential(floor_count: Floor, elevator_count: usize) -> Self {
        Self { min_floor: 1, max_floor: floor_count, elevator_count, ..Default::default() }
    }

    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            column_id: config_file.column_id.unwrap_or(defaults.column_id),
            column_status: config_file.column_status.unwrap_or(defaults.column_status),
            min_floor: config_file.min_floor.unwrap_or(defaults.min_floor),
            max_floor: config_file.max_floor.unwrap_or(defaults.max_floor),
            elevator_count: config_file.elevator_count.unwrap_or(defaults.elevator_count),
            starting_floor: config_file.starting_floor.or(defaults.starting_floor),
            door_dwell_seconds: config_file
                .door_dwell_seconds
                .unwrap_or(defaults.door_dwell_seconds),
            floor_travel_seconds: config_file
                .floor_travel_seconds
                .unwrap_or(defaults.floor_travel_seconds),
            max_weight_kg: config_file.max_weight_kg.unwrap_or(defaults.max_weight_kg),
            obstruction_threshold: config_file
                .obstruction_threshold
                .unwrap_or(defaults.obstruction_threshold),
            sensor_max_retries: config_file
                .sensor_max_retries
                .unwrap_or(defaults.sensor_max_retries),
            sensor_backoff_ms: config_file.sensor_backoff_ms.unwrap_or(defaults.sensor_backoff_ms),
            sensor_backoff_multiplier: config_file
                .sensor_backoff_multiplier
                .unwrap_or(defaults.sensor_backoff_multiplier),
            sensor_max_backoff_ms: config_file
                .sensor_max_backoff_ms
                .unwrap_or(defaults.sensor_max_backoff_ms),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.column_id {
            config.column_id = value;
        }
        if let Some(value) = args.min_floor {
            config.min_floor = value;
        }
        if let Some(value) = args.max_floor {
            config.max_floor = value;
        }
        if let Some(value) = args.elevator_count {
            config.elevator_count = value;
        }
        if let Some(value) = args.starting_floor {
            config.starting_floor = Some(value);
        }
        if let Some(value) = args.door_dwell_seconds {
            config.door_dwell_seconds = value;
        }
        if let Some(value) = args.floor_travel_seconds {
            config.floor_travel_seconds = value;
        }
        if let Some(value) = args.max_weight_kg {
            config.max_weight_kg = value;
        }
        if let Some(value) = args.obstruction_threshold {
            config.obstruction_threshold = value;
        }
        if let Some(value) = args.sensor_max_retries {
            config.sensor_max_retries = value;
        }
        if let Some(value) = args.sensor_backoff_ms {
            config.sensor_backoff_ms = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.column_id == 0 {
            return Err(ConfigValidationError::InvalidColumnId(self.column_id));
        }

        if self.min_floor >= self.max_floor {
            return Err(ConfigValidationError::InvalidFloorRange(self.min_floor, self.max_floor));
        }

        let floor_count = self.floor_count();
        if floor_count > MAX_FLOOR_COUNT {
            return Err(ConfigValidationError::TooManyFloors {
                count: floor_count,
                max: MAX_FLOOR_COUNT,
            });
        }

        if self.elevator_count == 0 {
            return Err(ConfigValidationError::InvalidElevatorCount(self.elevator_count));
        }

        if self.elevator_count > MAX_ELEVATOR_COUNT {
            return Err(ConfigValidationError::TooManyElevators {
                count: self.elevator_count,
                max: MAX_ELEVATOR_COUNT,
            });
        }

        if let Some(floor) = self.starting_floor {
            if !self.contains_floor(floor) {
                return Err(ConfigValidationError::StartingFloorOutOfRange {
                    floor,
                    min_floor: self.min_floor,
                    max_floor: self.max_floor,
                });
            }
        }

        if self.max_weight_kg == 0 {
            return Err(ConfigValidationError::InvalidMaxWeight(self.max_weight_kg));
        }

        if self.obstruction_threshold > 100 {
            return Err(ConfigValidationError::InvalidObstructionThreshold(
                self.obstruction_threshold,
            ));
        }

        if !self.sensor_backoff_multiplier.is_finite() || self.sensor_backoff_multiplier < 1.0 {
            return Err(ConfigValidationError::InvalidBackoffMultiplier(
                self.sensor_backoff_multiplier,
            ));
        }

        if self.sensor_backoff_ms > self.sensor_max_backoff_ms {
            return Err(ConfigValidationError::InvalidBackoffRange {
                initial_ms: self.sensor_backoff_ms,
                max_ms: self.sensor_max_backoff_ms,
            });
        }

        Ok(())
    }

    /// Number of floors served by the column
    pub fn floor_count(&self) -> usize {
        let span = i64::from(self.max_floor) - i64::from(self.min_floor) + 1;
        usize::try_from(span).unwrap_or(0)
    }

    /// Served floors as an inclusive range
    pub fn floor_range(&self) -> RangeInclusive<Floor> {
        self.min_floor..=self.max_floor
    }

    /// Check whether a floor is served by the column
    pub fn contains_floor(&self, floor: Floor) -> bool {
        self.floor_range().contains(&floor)
    }

    /// Floor every cab starts on
    pub fn home_floor(&self) -> Floor {
        self.starting_floor.unwrap_or(self.min_floor)
    }

    /// Door dwell time as a duration
    pub fn door_dwell(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.door_dwell_seconds as i64)
    }

    /// Travel time for one floor as a duration
    pub fn floor_travel_time(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.floor_travel_seconds as i64)
    }

    /// Retry policy applied to every sensor check
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.sensor_max_retries,
            initial_backoff_ms: self.sensor_backoff_ms,
            multiplier: self.sensor_backoff_multiplier,
            max_backoff_ms: self.sensor_max_backoff_ms,
        }
    }

    /// Thresholds that turn raw sensor readings into clear/blocked decisions
    pub fn sensor_thresholds(&self) -> SensorThresholds {
        SensorThresholds {
            max_weight_kg: self.max_weight_kg,
            obstruction_threshold: self.obstruction_threshold,
        }
    }
}
