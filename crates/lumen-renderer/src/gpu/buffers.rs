//! Vertex and index buffers for parsed geometry

use lumen_core::geometry::ParsedGeometry;
use lumen_core::logging::LogCategory;
use lumen_core::lumen_debug;
use wgpu::{Buffer, BufferAddress, BufferDescriptor, BufferUsages, Device, IndexFormat, Queue};

use crate::error::{RendererError, Result};

/// Round a byte length up to `COPY_BUFFER_ALIGNMENT`
pub fn padded_len(len: BufferAddress) -> BufferAddress {
    wgpu::util::align_to(len, wgpu::COPY_BUFFER_ALIGNMENT)
}

/// Index bytes padded with zeros so queue writes stay aligned
pub fn padded_index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice::<u16, u8>(indices).to_vec();
    bytes.resize(padded_len(bytes.len() as BufferAddress) as usize, 0);
    bytes
}

/// GPU-resident copy of one [`ParsedGeometry`]
pub struct GeometryBuffers {
    vertex: Buffer,
    index: Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl GeometryBuffers {
    /// Create both buffers and queue the uploads
    ///
    /// # Errors
    /// [`RendererError::EmptyGeometry`] when either section is empty.
    #[tracing::instrument(skip_all, fields(vertices = geometry.vertex_count(), indices = geometry.index_count()))]
    pub fn upload(device: &Device, queue: &Queue, geometry: &ParsedGeometry) -> Result<Self> {
        if geometry.points.is_empty() || geometry.indices.is_empty() {
            return Err(RendererError::EmptyGeometry {
                vertices: geometry.vertex_count(),
                indices: geometry.index_count(),
            });
        }

        let point_bytes = geometry.point_bytes();
        let vertex = device.create_buffer(&BufferDescriptor {
            label: Some("Vertex buffer"),
            size: point_bytes.len() as BufferAddress,
            usage: BufferUsages::COPY_DST | BufferUsages::VERTEX,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex, 0, point_bytes);

        let index_bytes = padded_index_bytes(&geometry.indices);
        let index = device.create_buffer(&BufferDescriptor {
            label: Some("Index buffer"),
            size: index_bytes.len() as BufferAddress,
            usage: BufferUsages::COPY_DST | BufferUsages::INDEX,
            mapped_at_creation: false,
        });
        queue.write_buffer(&index, 0, &index_bytes);

        lumen_debug!(
            LogCategory::Gpu,
            vertex_bytes = point_bytes.len(),
            index_bytes = index_bytes.len(),
            "Uploaded geometry buffers"
        );

        Ok(Self {
            vertex,
            index,
            vertex_count: geometry.vertex_count() as u32,
            index_count: geometry.index_count() as u32,
        })
    }

    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex
    }

    pub fn index_buffer(&self) -> &Buffer {
        &self.index
    }

    pub fn index_format(&self) -> IndexFormat {
        IndexFormat::Uint16
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{DeviceManager, DeviceOptions};

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(6), 8);
        assert_eq!(padded_len(8), 8);
    }

    #[test]
    fn test_index_bytes_are_padded() {
        let bytes = padded_index_bytes(&[1, 2, 3]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..6], bytemuck::cast_slice::<u16, u8>(&[1, 2, 3]));
        assert_eq!(&bytes[6..], &[0, 0]);

        assert_eq!(padded_index_bytes(&[1, 2, 3, 4, 5, 6]).len(), 12);
    }

    #[tokio::test]
    #[ignore] // Requires a GPU adapter
    async fn test_upload_rejects_empty_geometry() {
        let dm = DeviceManager::new(&DeviceOptions::default()).await.unwrap();

        let result = GeometryBuffers::upload(dm.device(), dm.queue(), &ParsedGeometry::default());
        assert!(matches!(result, Err(RendererError::EmptyGeometry { .. })));
    }

    #[tokio::test]
    #[ignore] // Requires a GPU adapter
    async fn test_upload_sizes() {
        let dm = DeviceManager::new(&DeviceOptions::default()).await.unwrap();
        let geometry = ParsedGeometry {
            points: vec![0.5; 15],
            indices: vec![0, 1, 2],
        };

        let buffers = GeometryBuffers::upload(dm.device(), dm.queue(), &geometry).unwrap();
        assert_eq!(buffers.vertex_buffer().size(), 60);
        assert_eq!(buffers.index_buffer().size(), 8);
        assert_eq!(buffers.index_count(), 3);
    }
}
