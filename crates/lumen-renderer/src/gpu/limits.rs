//! Minimal device limits for drawing one piece of geometry

use lumen_core::geometry::{ParsedGeometry, FLOATS_PER_VERTEX};
use wgpu::{BufferAddress, Limits};

use crate::gpu::buffers::padded_len;

/// Position (2 floats) and color (3 floats)
pub const VERTEX_ATTRIBUTE_COUNT: u32 = 2;
/// Byte stride of one vertex record
pub const VERTEX_STRIDE: BufferAddress = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as BufferAddress;

/// Limits derived from the size and layout of a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryLimits {
    pub max_vertex_attributes: u32,
    pub max_vertex_buffers: u32,
    pub max_vertex_buffer_array_stride: u32,
    pub max_buffer_size: u64,
}

impl GeometryLimits {
    pub fn for_geometry(geometry: &ParsedGeometry) -> Self {
        let vertex_bytes = padded_len(geometry.point_bytes().len() as u64);
        let index_bytes = padded_len(geometry.index_bytes().len() as u64);

        Self {
            max_vertex_attributes: VERTEX_ATTRIBUTE_COUNT,
            max_vertex_buffers: 1,
            max_vertex_buffer_array_stride: VERTEX_STRIDE as u32,
            max_buffer_size: vertex_bytes.max(index_bytes).max(wgpu::COPY_BUFFER_ALIGNMENT),
        }
    }

    /// Build the limits to request from a device.
    ///
    /// Starts from the WebGL2 downlevel baseline, keeps the adapter's texture
    /// resolution and offset alignments, then narrows the vertex limits.
    /// Falls back to what the adapter supports when the narrowed set would
    /// still exceed it.
    pub fn resolve(&self, supported: &Limits) -> Limits {
        let mut limits = Limits::downlevel_webgl2_defaults().using_resolution(supported.clone());

        limits.max_vertex_attributes = self.max_vertex_attributes;
        limits.max_vertex_buffers = self.max_vertex_buffers;
        limits.max_vertex_buffer_array_stride = self.max_vertex_buffer_array_stride;
        limits.max_buffer_size = self.max_buffer_size;
        limits.min_uniform_buffer_offset_alignment = supported.min_uniform_buffer_offset_alignment;
        limits.min_storage_buffer_offset_alignment = supported.min_storage_buffer_offset_alignment;

        if limits.check_limits(supported) {
            limits
        } else {
            supported.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn triangle() -> ParsedGeometry {
        ParsedGeometry {
            points: vec![0.0; 15],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_stride_is_five_floats() {
        assert_eq!(VERTEX_STRIDE, 20);
    }

    #[test]
    fn test_limits_fit_geometry() {
        let limits = GeometryLimits::for_geometry(&triangle());

        assert_eq!(limits.max_vertex_attributes, 2);
        assert_eq!(limits.max_vertex_buffers, 1);
        assert_eq!(limits.max_vertex_buffer_array_stride, 20);
        // 3 vertices * 20 bytes beats 3 indices padded to 8 bytes
        assert_eq!(limits.max_buffer_size, 60);
    }

    #[test]
    fn test_empty_geometry_keeps_minimum_size() {
        let limits = GeometryLimits::for_geometry(&ParsedGeometry::default());
        assert_eq!(limits.max_buffer_size, wgpu::COPY_BUFFER_ALIGNMENT);
    }

    #[test]
    fn test_resolve_copies_alignment() {
        let mut supported = Limits::default();
        supported.min_uniform_buffer_offset_alignment = 64;
        supported.min_storage_buffer_offset_alignment = 32;

        let limits = GeometryLimits::for_geometry(&triangle()).resolve(&supported);

        assert_eq!(limits.min_uniform_buffer_offset_alignment, 64);
        assert_eq!(limits.min_storage_buffer_offset_alignment, 32);
        assert_eq!(limits.max_vertex_attributes, 2);
        assert_eq!(limits.max_buffer_size, 60);
        assert_eq!(
            limits.max_texture_dimension_2d,
            supported.max_texture_dimension_2d
        );
    }

    #[test]
    fn test_resolve_falls_back_when_adapter_is_smaller() {
        let mut supported = Limits::default();
        supported.max_buffer_size = 16;

        let limits = GeometryLimits::for_geometry(&triangle()).resolve(&supported);
        assert_eq!(limits, supported);
    }
}
