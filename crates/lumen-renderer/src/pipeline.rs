//! Render pipeline for position + color geometry

use wgpu::{
    BlendComponent, BlendFactor, BlendOperation, BlendState, ColorTargetState, ColorWrites,
    Device, FragmentState, FrontFace, MultisampleState, PipelineCompilationOptions, PolygonMode,
    PrimitiveState, PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor, ShaderModule,
    TextureFormat, VertexAttribute, VertexBufferLayout, VertexState, VertexStepMode,
};

use crate::gpu::limits::VERTEX_STRIDE;
use crate::shader::{FRAGMENT_ENTRY_POINT, VERTEX_ENTRY_POINT};

/// `@location(0)` position, `@location(1)` color
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

/// Layout of one interleaved `[x, y, r, g, b]` record
pub fn vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Straight alpha blending on color, destination alpha kept as is
pub const GEOMETRY_BLEND: BlendState = BlendState {
    color: BlendComponent {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
        operation: BlendOperation::Add,
    },
    alpha: BlendComponent {
        src_factor: BlendFactor::Zero,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
};

pub fn primitive_state() -> PrimitiveState {
    PrimitiveState {
        topology: PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: FrontFace::Ccw,
        // Keep both windings visible
        cull_mode: None,
        unclipped_depth: false,
        polygon_mode: PolygonMode::Fill,
        conservative: false,
    }
}

/// Pipeline drawing indexed triangles into a single color target
pub struct GeometryPipeline {
    pipeline: RenderPipeline,
    format: TextureFormat,
}

impl GeometryPipeline {
    /// The layout is left to wgpu, derived from the shader.
    pub fn new(device: &Device, shader: &ShaderModule, format: TextureFormat) -> Self {
        let buffers = [vertex_layout()];
        let targets = [Some(ColorTargetState {
            format,
            blend: Some(GEOMETRY_BLEND),
            write_mask: ColorWrites::ALL,
        })];

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Geometry pipeline"),
            layout: None,
            vertex: VertexState {
                module: shader,
                entry_point: VERTEX_ENTRY_POINT,
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &buffers,
            },
            primitive: primitive_state(),
            depth_stencil: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: FRAGMENT_ENTRY_POINT,
                compilation_options: PipelineCompilationOptions::default(),
                targets: &targets,
            }),
            multiview: None,
        });

        Self { pipeline, format }
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }
}
