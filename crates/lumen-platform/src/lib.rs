//! Platform layer for Lumen
//!
//! Owns the window and event loop and drives a
//! [`GeometryRenderer`](lumen_renderer::GeometryRenderer) once per frame.

pub mod application;

pub use application::Application;

use lumen_core::LumenError;
use lumen_renderer::RendererError;

/// Platform-specific error type
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error(transparent)]
    Core(#[from] LumenError),
}
