//! Lumen Renderer
//!
//! wgpu setup around [`ParsedGeometry`](lumen_core::ParsedGeometry): device
//! acquisition, surface configuration, a single render pipeline, buffer
//! upload, async read-back and the per-frame draw.

pub mod error;
pub mod gpu;
pub mod pipeline;
pub mod renderer;
pub mod shader;

pub use error::{RendererError, Result};
pub use gpu::{
    DeviceManager, DeviceOptions, GeometryBuffers, GeometryLimits, GpuReport, SurfaceManager,
};
pub use pipeline::GeometryPipeline;
pub use renderer::{FrameOutcome, GeometryRenderer};

// Re-exported so downstream crates build against the same wgpu
pub use wgpu;
