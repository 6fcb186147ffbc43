//! Device management for wgpu
//!
//! Handles wgpu instance, adapter, device and queue initialization.

use lumen_core::config::{PowerPreferenceConfig, RendererConfig};
use lumen_core::logging::LogCategory;
use lumen_core::{lumen_error, lumen_info};
use wgpu::{
    Adapter, AdapterInfo, Backends, Device, DeviceDescriptor, Features, Instance,
    InstanceDescriptor, Limits, PowerPreference, Queue, RequestAdapterOptions, Surface,
};

use crate::error::{RendererError, Result};
use crate::gpu::limits::GeometryLimits;

/// Parse backend names from configuration; an empty list selects all backends
pub fn backends_from_names<S: AsRef<str>>(names: &[S]) -> Result<Backends> {
    if names.is_empty() {
        return Ok(Backends::all());
    }

    names.iter().try_fold(Backends::empty(), |acc, name| {
        let backend = match name.as_ref().to_ascii_lowercase().as_str() {
            "vulkan" => Backends::VULKAN,
            "metal" => Backends::METAL,
            "dx12" => Backends::DX12,
            "gl" | "opengl" => Backends::GL,
            "webgpu" => Backends::BROWSER_WEBGPU,
            "primary" => Backends::PRIMARY,
            "secondary" => Backends::SECONDARY,
            other => return Err(RendererError::UnknownBackend(other.to_string())),
        };
        Ok(acc | backend)
    })
}

fn power_preference(config: PowerPreferenceConfig) -> PowerPreference {
    match config {
        PowerPreferenceConfig::None => PowerPreference::None,
        PowerPreferenceConfig::LowPower => PowerPreference::LowPower,
        PowerPreferenceConfig::HighPerformance => PowerPreference::HighPerformance,
    }
}

/// Options for acquiring an adapter and device
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    pub backends: Backends,
    pub power_preference: PowerPreference,
    /// Narrow limits for one geometry; `None` requests everything the
    /// adapter offers
    pub geometry_limits: Option<GeometryLimits>,
    pub label: String,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            backends: Backends::all(),
            power_preference: PowerPreference::None,
            geometry_limits: None,
            label: "Lumen Device".to_string(),
        }
    }
}

impl DeviceOptions {
    pub fn from_config(config: &RendererConfig) -> Result<Self> {
        Ok(Self {
            backends: backends_from_names(&config.backends)?,
            power_preference: power_preference(config.power_preference),
            ..Default::default()
        })
    }

    pub fn with_geometry_limits(mut self, limits: GeometryLimits) -> Self {
        self.geometry_limits = Some(limits);
        self
    }
}

/// Named subset of limits worth printing
pub fn limit_summary(limits: &Limits) -> Vec<(&'static str, u64)> {
    vec![
        ("max_texture_dimension_1d", limits.max_texture_dimension_1d.into()),
        ("max_texture_dimension_2d", limits.max_texture_dimension_2d.into()),
        ("max_texture_dimension_3d", limits.max_texture_dimension_3d.into()),
        ("max_texture_array_layers", limits.max_texture_array_layers.into()),
        ("max_bind_groups", limits.max_bind_groups.into()),
        ("max_uniform_buffer_binding_size", limits.max_uniform_buffer_binding_size.into()),
        ("max_storage_buffer_binding_size", limits.max_storage_buffer_binding_size.into()),
        ("min_uniform_buffer_offset_alignment", limits.min_uniform_buffer_offset_alignment.into()),
        ("min_storage_buffer_offset_alignment", limits.min_storage_buffer_offset_alignment.into()),
        ("max_vertex_buffers", limits.max_vertex_buffers.into()),
        ("max_buffer_size", limits.max_buffer_size),
        ("max_vertex_attributes", limits.max_vertex_attributes.into()),
        ("max_vertex_buffer_array_stride", limits.max_vertex_buffer_array_stride.into()),
        ("max_inter_stage_shader_components", limits.max_inter_stage_shader_components.into()),
        ("max_compute_workgroup_storage_size", limits.max_compute_workgroup_storage_size.into()),
        ("max_compute_invocations_per_workgroup", limits.max_compute_invocations_per_workgroup.into()),
        ("max_compute_workgroup_size_x", limits.max_compute_workgroup_size_x.into()),
        ("max_compute_workgroup_size_y", limits.max_compute_workgroup_size_y.into()),
        ("max_compute_workgroup_size_z", limits.max_compute_workgroup_size_z.into()),
        ("max_compute_workgroups_per_dimension", limits.max_compute_workgroups_per_dimension.into()),
    ]
}

/// Feature names, sorted
pub fn feature_names(features: Features) -> Vec<String> {
    let mut names: Vec<String> = features
        .iter_names()
        .map(|(name, _)| name.to_string())
        .collect();
    names.sort();
    names
}

/// Snapshot of what an adapter or device offers
#[derive(Debug, Clone)]
pub struct GpuReport {
    pub info: AdapterInfo,
    pub features: Vec<String>,
    pub limits: Vec<(&'static str, u64)>,
}

/// Manages wgpu device and queue
pub struct DeviceManager {
    instance: Instance,
    adapter: Adapter,
    device: Device,
    queue: Queue,
}

impl DeviceManager {
    pub fn create_instance(backends: Backends) -> Instance {
        Instance::new(InstanceDescriptor {
            backends,
            ..Default::default()
        })
    }

    /// Create a headless device manager
    ///
    /// # Errors
    /// Returns error if no suitable adapter found or device creation fails
    pub async fn new(options: &DeviceOptions) -> Result<Self> {
        let instance = Self::create_instance(options.backends);
        Self::with_instance(instance, None, options).await
    }

    /// Create a device manager on an existing instance, optionally requiring
    /// the adapter to present to `compatible_surface`
    pub async fn with_instance(
        instance: Instance,
        compatible_surface: Option<&Surface<'_>>,
        options: &DeviceOptions,
    ) -> Result<Self> {
        lumen_info!(LogCategory::Gpu, "Requesting adapter...");
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: options.power_preference,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        lumen_info!(
            LogCategory::Gpu,
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "Got adapter"
        );

        let supported = adapter.limits();
        let required_limits = match options.geometry_limits {
            Some(geometry) => geometry.resolve(&supported),
            None => supported,
        };

        lumen_info!(LogCategory::Gpu, "Requesting device...");
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some(options.label.as_str()),
                    required_features: Features::empty(),
                    required_limits,
                },
                None,
            )
            .await?;

        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            lumen_error!(LogCategory::Gpu, %error, "Uncaptured device error");
        }));

        lumen_info!(LogCategory::Gpu, label = %options.label, "Got device");

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Get reference to the adapter
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the instance
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn adapter_info(&self) -> AdapterInfo {
        self.adapter.get_info()
    }

    /// Get device limits
    pub fn limits(&self) -> Limits {
        self.device.limits()
    }

    pub fn describe_adapter(&self) -> GpuReport {
        GpuReport {
            info: self.adapter.get_info(),
            features: feature_names(self.adapter.features()),
            limits: limit_summary(&self.adapter.limits()),
        }
    }

    pub fn describe_device(&self) -> GpuReport {
        GpuReport {
            info: self.adapter.get_info(),
            features: feature_names(self.device.features()),
            limits: limit_summary(&self.device.limits()),
        }
    }
}
