//! Window, GPU state and the render loop

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use lumen_core::config::{LumenConfig, WindowConfig};
use lumen_core::geometry::ParsedGeometry;
use lumen_core::logging::LogCategory;
use lumen_core::{lumen_debug, lumen_error, lumen_info};
use lumen_renderer::renderer::clear_color;
use lumen_renderer::shader::{create_shader_module, load_shader_module, GEOMETRY_SHADER};
use lumen_renderer::{
    DeviceManager, DeviceOptions, GeometryLimits, GeometryRenderer, RendererError,
    SurfaceManager,
};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::PlatformError;

/// Everything that lives on the GPU for one window.
///
/// Fields drop in declaration order: pipeline and buffers first, then the
/// surface, then device and instance.
struct GpuState {
    renderer: GeometryRenderer,
    surface: SurfaceManager,
    devices: DeviceManager,
}

impl GpuState {
    async fn new(
        window: Arc<Window>,
        config: &LumenConfig,
        geometry: &ParsedGeometry,
        shader_path: Option<&Path>,
    ) -> Result<Self, PlatformError> {
        let mut options = DeviceOptions::from_config(&config.renderer)?;
        if config.renderer.request_minimal_limits {
            options = options.with_geometry_limits(GeometryLimits::for_geometry(geometry));
        }

        let instance = DeviceManager::create_instance(options.backends);
        let surface = instance
            .create_surface(window.clone())
            .map_err(RendererError::from)?;
        let devices = DeviceManager::with_instance(instance, Some(&surface), &options).await?;

        let size = window.inner_size();
        let surface = SurfaceManager::new(
            surface,
            devices.device(),
            devices.adapter(),
            size.width,
            size.height,
            config.renderer.vsync,
        )?;

        let shader = match shader_path {
            Some(path) => load_shader_module(devices.device(), path)?,
            None => create_shader_module(devices.device(), "geometry.wgsl", GEOMETRY_SHADER),
        };

        let renderer = GeometryRenderer::new(
            devices.device(),
            devices.queue(),
            &shader,
            surface.format(),
            geometry,
            clear_color(config.renderer.clear_color),
        )?;

        Ok(Self {
            renderer,
            surface,
            devices,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        // Minimized windows report zero; keep the old configuration
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Err(e) = self
            .surface
            .resize(size.width, size.height, self.devices.device())
        {
            lumen_error!(LogCategory::Platform, error = %e, "Surface resize failed");
        }
    }

    fn render(&mut self) -> Result<(), RendererError> {
        let outcome = self.renderer.render_frame(
            self.devices.device(),
            self.devices.queue(),
            &mut self.surface,
        )?;
        lumen_debug!(LogCategory::Platform, ?outcome, "Frame");
        Ok(())
    }
}

fn window_builder(config: &WindowConfig) -> WindowBuilder {
    WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
}

/// Opens a window and draws one geometry until the window is closed
pub struct Application {
    config: LumenConfig,
    geometry: ParsedGeometry,
    shader_path: Option<PathBuf>,
}

impl Application {
    pub fn new(config: LumenConfig, geometry: ParsedGeometry) -> Self {
        Self {
            config,
            geometry,
            shader_path: None,
        }
    }

    /// Use a WGSL file instead of the embedded shader
    pub fn with_shader(mut self, path: impl Into<PathBuf>) -> Self {
        self.shader_path = Some(path.into());
        self
    }

    /// Run the event loop.
    ///
    /// GPU resources are released when this returns, on success and on
    /// every error path.
    ///
    /// # Errors
    /// Window or GPU setup failures, and the first fatal render error.
    pub fn run(self) -> Result<(), PlatformError> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        let window = Arc::new(
            window_builder(&self.config.window)
                .build(&event_loop)
                .map_err(|e| PlatformError::WindowCreation(e.to_string()))?,
        );
        lumen_info!(
            LogCategory::Platform,
            title = %self.config.window.title,
            width = self.config.window.width,
            height = self.config.window.height,
            "Window created"
        );

        let mut state = pollster::block_on(GpuState::new(
            window.clone(),
            &self.config,
            &self.geometry,
            self.shader_path.as_deref(),
        ))?;

        let failure: Rc<RefCell<Option<RendererError>>> = Rc::new(RefCell::new(None));
        let loop_failure = failure.clone();
        let window_id = window.id();

        event_loop
            .run(move |event, elwt| {
                elwt.set_control_flow(ControlFlow::Wait);

                match event {
                    Event::WindowEvent {
                        window_id: id,
                        event,
                    } if id == window_id => match event {
                        WindowEvent::CloseRequested => {
                            lumen_info!(LogCategory::Platform, "Close requested");
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => state.resize(size),
                        WindowEvent::RedrawRequested => {
                            if let Err(e) = state.render() {
                                lumen_error!(LogCategory::Platform, error = %e, "Render failed");
                                *loop_failure.borrow_mut() = Some(e);
                                elwt.exit();
                            }
                        }
                        _ => {}
                    },
                    Event::AboutToWait => window.request_redraw(),
                    Event::LoopExiting => {
                        lumen_info!(LogCategory::Platform, "Event loop exiting");
                    }
                    _ => {}
                }
            })
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        let failure = failure.borrow_mut().take();
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_keeps_shader_override() {
        let app = Application::new(LumenConfig::default(), ParsedGeometry::default())
            .with_shader("resources/shader.wgsl");
        assert_eq!(app.shader_path.as_deref(), Some(Path::new("resources/shader.wgsl")));
    }

    #[test]
    fn test_window_builder_uses_config() {
        let config = WindowConfig {
            title: "Test".to_string(),
            width: 320,
            height: 200,
            resizable: true,
        };
        let builder = window_builder(&config);
        let attributes = builder.window_attributes();

        assert_eq!(attributes.title, "Test");
        assert!(attributes.resizable);
    }
}
