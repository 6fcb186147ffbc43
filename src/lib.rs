//! Lumen - step-by-step wgpu snapshots around a small geometry text format
//!
//! The workspace is split into three crates:
//!
//! - [`lumen_core`]: geometry loader, configuration, errors and logging
//! - [`lumen_renderer`]: wgpu device, surface, pipeline, buffers and read-back
//! - [`lumen_platform`]: the window and event loop that drive the renderer
//!
//! ```no_run
//! use lumen::prelude::{Application, GeometryLoader, LumenConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LumenConfig::default();
//!     lumen::init(&config)?;
//!
//!     let geometry = GeometryLoader::new().load("resources/webgpu.txt")?;
//!     Application::new(config, geometry).run()?;
//!     Ok(())
//! }
//! ```

pub use lumen_core;
pub use lumen_platform;
pub use lumen_renderer;

pub use lumen_core::{init, VERSION};

/// Unified prelude module that exports all commonly used types
pub mod prelude {
    pub use lumen_core::prelude::*;
    pub use lumen_platform::{Application, PlatformError};
    pub use lumen_renderer::{
        DeviceManager, DeviceOptions, GeometryRenderer, RendererError, SurfaceManager,
    };
}
