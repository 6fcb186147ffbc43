//! Error types for the renderer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Unknown backend '{0}'")]
    UnknownBackend(String),

    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface is not supported by the selected adapter")]
    UnsupportedSurface,

    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    #[error("Failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Failed to read shader {path}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Geometry has {vertices} vertices and {indices} indices, both must be non-empty")]
    EmptyGeometry { vertices: usize, indices: usize },

    #[error("Copy size {0} is not a multiple of {align}", align = wgpu::COPY_BUFFER_ALIGNMENT)]
    MisalignedCopy(wgpu::BufferAddress),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Buffer mapping callback was dropped before completing")]
    MapChannelClosed,
}

pub type Result<T> = std::result::Result<T, RendererError>;
