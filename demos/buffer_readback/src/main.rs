//! Copy between two buffers on the GPU and map the result back to the host

use lumen_core::config::LumenConfig;
use lumen_core::logging::LogCategory;
use lumen_core::lumen_info;
use lumen_renderer::gpu::read_buffer;
use lumen_renderer::wgpu::util::{BufferInitDescriptor, DeviceExt};
use lumen_renderer::wgpu::BufferUsages;
use lumen_renderer::{DeviceManager, DeviceOptions};

const BUFFER_SIZE: u8 = 16;

fn main() -> anyhow::Result<()> {
    let config = LumenConfig::default();
    lumen_core::init(&config)?;

    let devices = pollster::block_on(DeviceManager::new(&DeviceOptions::from_config(
        &config.renderer,
    )?))?;

    let contents: Vec<u8> = (0..BUFFER_SIZE).collect();
    lumen_info!(LogCategory::Gpu, ?contents, "Uploading");

    let source = devices.device().create_buffer_init(&BufferInitDescriptor {
        label: Some("Source buffer"),
        contents: &contents,
        usage: BufferUsages::COPY_SRC,
    });

    let bytes = pollster::block_on(read_buffer(
        devices.device(),
        devices.queue(),
        &source,
        contents.len() as u64,
    ))?;
    lumen_info!(LogCategory::Gpu, ?bytes, "Read back");

    anyhow::ensure!(bytes == contents, "read back {:?}, expected {:?}", bytes, contents);
    Ok(())
}
