//! Load a geometry text file and draw it in a window
//!
//! Usage: `geometry_viewer [config.ron] [geometry.txt]`

use std::path::PathBuf;

use anyhow::Context;
use lumen_core::config::LumenConfig;
use lumen_core::geometry::GeometryLoader;
use lumen_core::logging::LogCategory;
use lumen_core::{lumen_info, lumen_warn};
use lumen_platform::Application;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => LumenConfig::load(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => LumenConfig::default(),
    };
    lumen_core::init(&config)?;

    let geometry_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.geometry.path.clone());
    let loader = GeometryLoader::with_options(config.geometry.loader_options());
    let geometry = loader
        .load(&geometry_path)
        .with_context(|| format!("loading geometry from {}", geometry_path.display()))?;

    lumen_info!(
        LogCategory::Geometry,
        path = %geometry_path.display(),
        vertices = geometry.vertex_count(),
        triangles = geometry.triangle_count(),
        "Geometry ready"
    );
    if geometry.is_empty() {
        lumen_warn!(LogCategory::Geometry, path = %geometry_path.display(), "Nothing to draw");
    }

    Application::new(config, geometry).run()?;
    Ok(())
}
