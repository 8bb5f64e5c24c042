//! Logging built on `tracing-subscriber`
//!
//! Console output (colored on a TTY), an optional log file in full, compact or
//! JSON format, and a reloadable level filter.

pub mod config;
pub mod error;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use std::sync::Arc;

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload};
use writer::LogFileWriter;

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Changes the active filter of the installed subscriber.
#[derive(Clone)]
pub struct LogLevelHandle {
    pub(crate) inner: Arc<reload::Handle<EnvFilter, Registry>>,
}

impl LogLevelHandle {
    /// Accepts plain levels and full `EnvFilter` directives (`info,widgets_rs=debug`).
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        let filter = EnvFilter::try_new(level)
            .map_err(|e| LoggerError::config(format!("Invalid filter '{level}': {e}")))?;
        self.inner
            .reload(filter)
            .map_err(|e| LoggerError::config(e.to_string()))
    }

    pub fn current_level(&self) -> Option<String> {
        self.inner.with_current(|filter| filter.to_string()).ok()
    }
}

/// A handle bound to a subscriber that is never installed globally.
///
/// The handle stays usable for as long as the returned subscriber lives.
#[cfg(test)]
pub(crate) fn detached_handle(
    level: &str,
) -> (LogLevelHandle, impl tracing::Subscriber + Send + Sync) {
    let (filter_layer, reload_handle) = reload::Layer::new(EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter_layer);
    let handle = LogLevelHandle {
        inner: Arc::new(reload_handle),
    };
    (handle, subscriber)
}

/// Installs the global subscriber.
pub fn init_logger(config: LoggerConfig) -> Result<LogLevelHandle, LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, reload_handle) = reload::Layer::new(filter);

    // File layer goes first, otherwise console ANSI codes leak into span fields
    // of the file output (tokio-rs/tracing#1817).
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(layers)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized {
            message: e.to_string(),
        })?;

    Ok(LogLevelHandle {
        inner: Arc::new(reload_handle),
    })
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = LogFileWriter::new(config)?;

    let layer = match config.format {
        LogFormat::Full => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_ansi(false)
            .json()
            .with_writer(writer)
            .boxed(),
    };

    Ok(layer)
}
