//! Core functionality for Lumen
//!
//! This crate holds the pieces of Lumen that do not touch the GPU: the
//! geometry text loader, configuration, error types and logging setup.

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;

pub use config::{GeometryConfig, LoggingConfig, LumenConfig, RendererConfig, WindowConfig};
pub use error::{GeometryError, LumenError, Result};
pub use geometry::{
    load_geometry, GeometryLoader, IndexPolicy, LoaderOptions, NumberPolicy, ParsedGeometry,
};
pub use logging::{LogCategory, LogLevel};

// Used by the logging macros
#[doc(hidden)]
pub use tracing;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        config::LumenConfig,
        error::{GeometryError, LumenError, Result},
        geometry::{GeometryLoader, LoaderOptions, ParsedGeometry},
        logging::{LogCategory, LogLevel},
    };
}

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from the given configuration
pub fn init(config: &LumenConfig) -> Result<()> {
    logging::init(&config.logging)?;
    lumen_info!(LogCategory::Core, "Lumen Core v{} initialized", VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
