//! Instance, adapter and device: print what the GPU offers and what the
//! device was created with

use lumen_core::config::LumenConfig;
use lumen_core::logging::LogCategory;
use lumen_core::lumen_info;
use lumen_renderer::{DeviceManager, DeviceOptions, GpuReport};

fn log_report(kind: &str, report: &GpuReport) {
    lumen_info!(
        LogCategory::Gpu,
        kind,
        name = %report.info.name,
        backend = ?report.info.backend,
        device_type = ?report.info.device_type,
        driver = %report.info.driver,
        "Report"
    );

    for feature in &report.features {
        lumen_info!(LogCategory::Gpu, kind, feature = %feature, "Feature");
    }
    for (limit, value) in &report.limits {
        lumen_info!(LogCategory::Gpu, kind, limit, value, "Limit");
    }
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => LumenConfig::load(path)?,
        None => LumenConfig::default(),
    };
    lumen_core::init(&config)?;

    let options = DeviceOptions::from_config(&config.renderer)?;
    let devices = pollster::block_on(DeviceManager::new(&options))?;

    log_report("adapter", &devices.describe_adapter());
    log_report("device", &devices.describe_device());

    Ok(())
}
