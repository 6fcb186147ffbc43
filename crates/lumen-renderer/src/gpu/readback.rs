//! Reading GPU buffers back to the CPU
//!
//! Mapping is callback driven in wgpu. The callback resolves a oneshot
//! channel and `Device::poll` drives it to completion, so the whole read is a
//! single future that finishes on the calling thread.

use futures::channel::oneshot;
use lumen_core::logging::LogCategory;
use lumen_core::lumen_trace;
use wgpu::{
    Buffer, BufferAddress, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Device,
    Maintain, MapMode, Queue,
};

use crate::error::{RendererError, Result};

/// Copy `size` bytes from the start of `source` into a staging buffer and
/// read them back.
///
/// `source` needs `COPY_SRC` usage and `size` must be a multiple of
/// [`wgpu::COPY_BUFFER_ALIGNMENT`].
pub async fn read_buffer(
    device: &Device,
    queue: &Queue,
    source: &Buffer,
    size: BufferAddress,
) -> Result<Vec<u8>> {
    if size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(RendererError::MisalignedCopy(size));
    }

    let staging = device.create_buffer(&BufferDescriptor {
        label: Some("Readback staging buffer"),
        size,
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("Readback encoder"),
    });
    encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    map_read(device, &staging).await
}

/// Map a `MAP_READ` buffer, copy its contents out and unmap it again
pub async fn map_read(device: &Device, buffer: &Buffer) -> Result<Vec<u8>> {
    let slice = buffer.slice(..);
    let (sender, receiver) = oneshot::channel();

    slice.map_async(MapMode::Read, move |result| {
        // The receiver only disappears if the caller gave up on the future
        let _ = sender.send(result);
    });

    lumen_trace!(LogCategory::Gpu, size = buffer.size(), "Waiting for buffer map");
    let _ = device.poll(Maintain::Wait);

    receiver.await.map_err(|_| RendererError::MapChannelClosed)??;

    let bytes = slice.get_mapped_range().to_vec();
    buffer.unmap();
    Ok(bytes)
}
