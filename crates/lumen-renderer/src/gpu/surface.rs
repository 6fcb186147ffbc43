//! Surface management for window integration
//!
//! Handles wgpu Surface configuration and resize management.

use lumen_core::logging::LogCategory;
use lumen_core::{lumen_debug, lumen_info};
use wgpu::{
    Adapter, CompositeAlphaMode, Device, PresentMode, Surface, SurfaceConfiguration,
    SurfaceError, SurfaceTexture, TextureFormat, TextureUsages,
};

use crate::error::{RendererError, Result};

/// Present mode for the vsync setting
pub fn present_mode(vsync: bool) -> PresentMode {
    if vsync {
        PresentMode::Fifo
    } else {
        PresentMode::AutoNoVsync
    }
}

/// Pick the first sRGB format, otherwise the adapter's preferred one
pub fn select_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RendererError::InvalidSurfaceSize { width, height });
    }
    Ok(())
}

/// Manages wgpu surface and its configuration
pub struct SurfaceManager {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

impl SurfaceManager {
    /// Configure `surface` for presenting at the given size
    ///
    /// # Errors
    /// [`RendererError::UnsupportedSurface`] when the adapter reports no
    /// usable format for the surface.
    pub fn new(
        surface: Surface<'static>,
        device: &Device,
        adapter: &Adapter,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<Self> {
        let capabilities = surface.get_capabilities(adapter);

        let format = select_format(&capabilities.formats).ok_or(RendererError::UnsupportedSurface)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(CompositeAlphaMode::Auto);

        lumen_debug!(
            LogCategory::Gpu,
            formats = ?capabilities.formats,
            alpha_modes = ?capabilities.alpha_modes,
            "Surface capabilities"
        );

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &config);

        lumen_info!(
            LogCategory::Gpu,
            format = ?format,
            width = config.width,
            height = config.height,
            "Surface configured"
        );

        Ok(Self { surface, config })
    }

    /// Resize the surface
    pub fn resize(&mut self, width: u32, height: u32, device: &Device) -> Result<()> {
        validate_dimensions(width, height)?;

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);

        lumen_debug!(LogCategory::Gpu, width, height, "Surface resized");
        Ok(())
    }

    /// Apply the current configuration again, after the surface was lost
    pub fn reconfigure(&mut self, device: &Device) {
        self.surface.configure(device, &self.config);
    }

    /// Get current surface texture for rendering
    pub fn get_current_texture(&mut self) -> std::result::Result<SurfaceTexture, SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn config(&self) -> &SurfaceConfiguration {
        &self.config
    }
}
