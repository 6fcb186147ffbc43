//! WGSL shader loading

use std::borrow::Cow;
use std::path::Path;

use lumen_core::logging::LogCategory;
use lumen_core::lumen_debug;
use wgpu::{Device, ShaderModule, ShaderModuleDescriptor, ShaderSource};

use crate::error::{RendererError, Result};

/// Default shader for position + color geometry
pub const GEOMETRY_SHADER: &str = include_str!("../../../resources/shader.wgsl");

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Compile WGSL source into a shader module
pub fn create_shader_module(device: &Device, label: &str, source: &str) -> ShaderModule {
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some(label),
        source: ShaderSource::Wgsl(Cow::Borrowed(source)),
    })
}

/// Read WGSL source from disk
pub fn read_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| RendererError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and compile a WGSL file
pub fn load_shader_module(device: &Device, path: impl AsRef<Path>) -> Result<ShaderModule> {
    let path = path.as_ref();
    let source = read_shader_source(path)?;
    lumen_debug!(LogCategory::Gpu, path = %path.display(), bytes = source.len(), "Loaded shader");

    let label = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("shader");
    Ok(create_shader_module(device, label, &source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_shader_has_entry_points() {
        assert!(GEOMETRY_SHADER.contains(&format!("fn {}", VERTEX_ENTRY_POINT)));
        assert!(GEOMETRY_SHADER.contains(&format!("fn {}", FRAGMENT_ENTRY_POINT)));
        assert!(GEOMETRY_SHADER.contains("@location(1) color: vec3f"));
    }

    #[test]
    fn test_missing_shader_reports_path() {
        let err = read_shader_source("no/such/shader.wgsl").unwrap_err();
        match err {
            RendererError::ShaderSource { path, .. } => {
                assert_eq!(path, Path::new("no/such/shader.wgsl"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
