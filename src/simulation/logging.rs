//! Logging and tracing configuration
//!
//! Central place where the binary and the tests install a tracing subscriber.
//! Status events reach the log through [`crate::events::TracingSink`]; this
//! module only decides where those records go and how they look.

use std::io;
use tracing::{debug, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Boxed error returned by subscriber installation
pub type LoggingInitError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the crate's own targets
    pub level: Level,
    /// Whether to enable JSON formatting on the console
    pub json_format: bool,
    /// Whether to also log to a daily rolling file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to record span enter/exit events
    pub enable_span_events: bool,
    /// Whether to enable ANSI colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter, overrides `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "elevator-column-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggingInitError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<(), LoggingInitError> {
        let registry = Registry::default().with(self.build_filter()?);

        if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let (file_writer, file_guard) =
                non_blocking(rolling::daily(log_dir, &self.log_file_prefix));

            // Files always get JSON records
            let file_layer = fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_span_events(self.span_events());

            if self.json_format {
                let console_layer =
                    fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            } else {
                let console_layer = fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(self.span_events());
                registry.with(file_layer).with(console_layer).try_init()?;
            }

            // The writer thread must outlive the process-wide subscriber
            std::mem::forget(file_guard);
        } else if self.json_format {
            let layer =
                fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        } else {
            let layer = fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events());
            registry.with(layer).try_init()?;
        }

        debug!(level = %self.level, json = self.json_format, file = self.log_to_file, "Logging initialized");
        Ok(())
    }

    /// Initialize logging for development (pretty console output)
    pub fn init_dev() -> Result<(), LoggingInitError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }

    /// Initialize logging for production (JSON format with file logging)
    pub fn init_prod(log_dir: impl Into<String>) -> Result<(), LoggingInitError> {
        Self::new()
            .with_level(Level::INFO)
            .with_json_format()
            .with_file_logging(log_dir)
            .without_ansi()
            .init()
    }

    /// Initialize logging for testing (minimal output)
    pub fn init_test() -> Result<(), LoggingInitError> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }

    /// Initialize verbose logging (INFO level, every status event visible)
    pub fn init_verbose() -> Result<(), LoggingInitError> {
        Self::new().with_level(Level::INFO).init()
    }

    /// Initialize debug logging (DEBUG level with span events)
    pub fn init_debug() -> Result<(), LoggingInitError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }
}
