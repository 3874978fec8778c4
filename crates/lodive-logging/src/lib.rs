//! JSONL and console logging for the Lodive client
//!
//! Every Lodive crate logs through `tracing` with structured fields
//! (`program`, `mapping`, `wallet`, `generation`, ...). This crate installs
//! the subscriber that renders them.
//!
//! # Quick Start
//!
//! ```ignore
//! use lodive_logging::{LodiveSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! LodiveSubscriberBuilder::new().init();
//!
//! // Development mode with pretty human-readable output
//! LodiveSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```

pub mod config;

pub use config::{ConsoleConfig, ConsoleFormat, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log file: {0}")]
    File(#[from] std::io::Error),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builder for configuring and initializing the Lodive logging subscriber
///
/// By default, console output uses JSONL format. Use `LogConfig::development()`
/// for human-readable pretty output during development.
pub struct LodiveSubscriberBuilder {
    config: LogConfig,
}

impl LodiveSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    fn json_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let jsonl = &self.config.jsonl;
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(jsonl.include_spans)
            .flatten_event(jsonl.flatten_events)
            .with_file(jsonl.include_location)
            .with_line_number(jsonl.include_location)
            .with_writer(writer)
            .boxed()
    }

    /// Build the output layers and the file writer guard, if any
    fn layers(&self) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>), LoggingError> {
        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            if self.config.console.format == ConsoleFormat::Pretty {
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(self.config.console.ansi)
                        .with_target(true)
                        .boxed(),
                );
            } else {
                layers.push(self.json_layer(std::io::stdout));
            }
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = create_file_writer(file_config)?;
            layers.push(self.json_layer(writer));
            guard = Some(file_guard);
        }

        Ok((layers, guard))
    }

    /// Try to initialize the subscriber globally
    ///
    /// Returns the file writer guard, which must be kept alive for the
    /// duration of the program when file output is enabled.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.level));

        let (layers, guard) = self.layers()?;

        Registry::default()
            .with(layers)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;

        Ok(guard)
    }

    /// Initialize the subscriber globally, reporting failures on stderr
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }
}

impl Default for LodiveSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates for `Never` rotation, appends through a rolling appender otherwise
fn create_file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    match config.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&config.directory)?;
            let path = config.directory.join(format!("{}.log", config.prefix));
            let file = File::create(path)?;
            Ok(tracing_appender::non_blocking(file))
        }
        RotationStrategy::Daily => {
            let appender = RollingFileAppender::new(Rotation::DAILY, &config.directory, &config.prefix);
            Ok(tracing_appender::non_blocking(appender))
        }
        RotationStrategy::Hourly => {
            let appender = RollingFileAppender::new(Rotation::HOURLY, &config.directory, &config.prefix);
            Ok(tracing_appender::non_blocking(appender))
        }
    }
}

/// Initialize logging with default settings (JSONL to console)
pub fn init_default() {
    LodiveSubscriberBuilder::new().init();
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() {
    LodiveSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Initialize logging for testing (minimal output); safe to call repeatedly
pub fn init_testing() {
    let _ = LodiveSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
