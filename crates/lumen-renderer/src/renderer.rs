//! Per-frame rendering of uploaded geometry

use lumen_core::geometry::ParsedGeometry;
use lumen_core::logging::LogCategory;
use lumen_core::{lumen_debug, lumen_warn};
use wgpu::{
    Color, CommandEncoderDescriptor, Device, LoadOp, Operations, Queue, RenderPass,
    RenderPassColorAttachment, RenderPassDescriptor, ShaderModule, StoreOp, SurfaceError,
    TextureView, TextureViewDescriptor,
};

use crate::error::Result;
use crate::gpu::{GeometryBuffers, SurfaceManager};
use crate::pipeline::GeometryPipeline;

/// What happened to a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No texture was available; the surface was reconfigured or timed out
    Skipped,
}

pub fn clear_color(rgba: [f64; 4]) -> Color {
    let [r, g, b, a] = rgba;
    Color { r, g, b, a }
}

/// Draws one piece of geometry each frame
pub struct GeometryRenderer {
    pipeline: GeometryPipeline,
    buffers: GeometryBuffers,
    clear_color: Color,
}

impl GeometryRenderer {
    /// Build the pipeline for `format` and upload `geometry`
    pub fn new(
        device: &Device,
        queue: &Queue,
        shader: &ShaderModule,
        format: wgpu::TextureFormat,
        geometry: &ParsedGeometry,
        clear_color: Color,
    ) -> Result<Self> {
        let pipeline = GeometryPipeline::new(device, shader, format);
        let buffers = GeometryBuffers::upload(device, queue, geometry)?;

        Ok(Self {
            pipeline,
            buffers,
            clear_color,
        })
    }

    pub fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }

    /// Record the draw into an open render pass
    pub fn record<'a>(&'a self, pass: &mut RenderPass<'a>) {
        pass.set_pipeline(self.pipeline.pipeline());
        pass.set_vertex_buffer(0, self.buffers.vertex_buffer().slice(..));
        pass.set_index_buffer(
            self.buffers.index_buffer().slice(..),
            self.buffers.index_format(),
        );
        pass.draw_indexed(0..self.buffers.index_count(), 0, 0..1);
    }

    /// Clear `view` and draw the geometry into it
    pub fn encode(&self, device: &Device, view: &TextureView) -> wgpu::CommandBuffer {
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Frame encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Geometry pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.record(&mut pass);
        }

        encoder.finish()
    }

    /// Acquire the next surface texture, draw, submit and present.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(
        &self,
        device: &Device,
        queue: &Queue,
        surface: &mut SurfaceManager,
    ) -> Result<FrameOutcome> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                lumen_debug!(LogCategory::Renderer, "Surface lost or outdated, reconfiguring");
                surface.reconfigure(device);
                return Ok(FrameOutcome::Skipped);
            }
            Err(SurfaceError::Timeout) => {
                lumen_warn!(LogCategory::Renderer, "Timed out acquiring surface texture");
                return Ok(FrameOutcome::Skipped);
            }
            Err(e) => return Err(e.into()),
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        queue.submit(std::iter::once(self.encode(device, &view)));
        frame.present();

        Ok(FrameOutcome::Presented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{read_buffer, DeviceManager, DeviceOptions};
    use crate::shader::{create_shader_module, GEOMETRY_SHADER};
    use wgpu::{
        BufferDescriptor, BufferUsages, Extent3d, ImageCopyBuffer, ImageDataLayout,
        TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
    };

    #[test]
    fn test_clear_color_channels() {
        let color = clear_color([0.9, 0.1, 0.2, 1.0]);
        assert_eq!(color, Color { r: 0.9, g: 0.1, b: 0.2, a: 1.0 });
    }

    #[tokio::test]
    #[ignore] // Requires a GPU adapter
    async fn test_offscreen_clear() {
        let dm = DeviceManager::new(&DeviceOptions::default()).await.unwrap();
        let device = dm.device();
        let format = TextureFormat::Rgba8Unorm;

        // Geometry far outside clip space: only the clear color lands
        let geometry = ParsedGeometry {
            points: vec![
                10.0, 10.0, 1.0, 1.0, 1.0, //
                11.0, 10.0, 1.0, 1.0, 1.0, //
                10.0, 11.0, 1.0, 1.0, 1.0,
            ],
            indices: vec![0, 1, 2],
        };
        let shader = create_shader_module(device, "geometry", GEOMETRY_SHADER);
        let renderer = GeometryRenderer::new(
            device,
            dm.queue(),
            &shader,
            format,
            &geometry,
            clear_color([0.0, 0.0, 1.0, 1.0]),
        )
        .unwrap();

        let size = Extent3d {
            width: 64,
            height: 1,
            depth_or_array_layers: 1,
        };
        let target = device.create_texture(&TextureDescriptor {
            label: Some("Offscreen target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&TextureViewDescriptor::default());
        dm.queue().submit(std::iter::once(renderer.encode(device, &view)));

        // 64 pixels * 4 bytes = 256, one aligned row
        let readback = device.create_buffer(&BufferDescriptor {
            label: Some("Pixels"),
            size: 256,
            usage: BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            target.as_image_copy(),
            ImageCopyBuffer {
                buffer: &readback,
                layout: ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: None,
                },
            },
            size,
        );
        dm.queue().submit(std::iter::once(encoder.finish()));

        let pixels = read_buffer(device, dm.queue(), &readback, 256).await.unwrap();
        assert_eq!(&pixels[..4], &[0, 0, 255, 255]);
    }
}
