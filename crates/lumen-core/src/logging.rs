//! Logging system for Lumen
//!
//! Thin layer over `tracing`: every category maps to a `tracing` target so
//! verbosity can be tuned per subsystem, either from the configuration file
//! or through `RUST_LOG`.

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{LumenError, Result};

/// Log levels for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert string to LogLevel
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Categories for organizing log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Core,
    Geometry,
    Gpu,
    Renderer,
    Platform,
}

impl LogCategory {
    pub const ALL: [LogCategory; 5] = [
        LogCategory::Core,
        LogCategory::Geometry,
        LogCategory::Gpu,
        LogCategory::Renderer,
        LogCategory::Platform,
    ];

    /// The `tracing` target used for this category
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Core => "lumen::core",
            LogCategory::Geometry => "lumen::geometry",
            LogCategory::Gpu => "lumen::gpu",
            LogCategory::Renderer => "lumen::renderer",
            LogCategory::Platform => "lumen::platform",
        }
    }

    /// Short name used as key in [`LoggingConfig::category_levels`]
    pub const fn name(&self) -> &'static str {
        match self {
            LogCategory::Core => "core",
            LogCategory::Geometry => "geometry",
            LogCategory::Gpu => "gpu",
            LogCategory::Renderer => "renderer",
            LogCategory::Platform => "platform",
        }
    }

    pub fn from_name(name: &str) -> Option<LogCategory> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convenience macros for structured logging
#[macro_export]
macro_rules! lumen_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::tracing::trace!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_debug {
    ($category:expr, $($arg:tt)*) => {
        $crate::tracing::debug!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::tracing::info!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_warn {
    ($category:expr, $($arg:tt)*) => {
        $crate::tracing::warn!(target: $category.as_str(), $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::tracing::error!(target: $category.as_str(), $($arg)*)
    };
}

/// Build the filter for the given configuration.
///
/// `RUST_LOG` wins when it is set and valid.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(config.filter_directives()?)
        .map_err(|e| LumenError::configuration(format!("Invalid log filter: {}", e)))
}

/// Initialize the logging system
///
/// # Errors
/// Fails when the configuration holds unknown levels or when a global
/// subscriber has already been installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(config.with_target)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| LumenError::initialization(format!("Failed to install logger: {}", e)))
}
