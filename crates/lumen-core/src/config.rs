//! Configuration system for Lumen
//!
//! Configuration is read from a RON or JSON file. Every field has a default,
//! so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LumenError, Result};
use crate::geometry::{IndexPolicy, LoaderOptions, NumberPolicy};
use crate::logging::{LogCategory, LogLevel};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub logging: LoggingConfig,
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub geometry: GeometryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to everything not listed in `category_levels`
    pub level: String,
    /// Category-specific log levels (category name -> level string)
    pub category_levels: HashMap<String, String>,
    /// Print the `tracing` target next to each message
    pub with_target: bool,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

/// Adapter power preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreferenceConfig {
    #[default]
    None,
    LowPower,
    HighPerformance,
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// RGBA color the frame is cleared with, each channel in `[0, 1]`
    pub clear_color: [f64; 4],
    pub vsync: bool,
    pub power_preference: PowerPreferenceConfig,
    /// Backend names ("vulkan", "metal", "dx12", "gl", "webgpu"); empty means all
    pub backends: Vec<String>,
    /// Ask the device for the smallest limits the geometry needs instead of
    /// the adapter defaults
    pub request_minimal_limits: bool,
}

/// Geometry source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub path: PathBuf,
    pub number_policy: NumberPolicy,
    pub index_policy: IndexPolicy,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut category_levels = HashMap::new();
        category_levels.insert(LogCategory::Geometry.name().to_string(), "info".to_string());
        category_levels.insert(LogCategory::Gpu.name().to_string(), "info".to_string());
        // wgpu internals are chatty at info
        category_levels.insert("wgpu_core".to_string(), "warn".to_string());
        category_levels.insert("wgpu_hal".to_string(), "warn".to_string());

        Self {
            level: LogLevel::Info.to_string(),
            category_levels,
            with_target: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lumen".to_string(),
            width: 640,
            height: 480,
            resizable: false,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.9, 0.1, 0.2, 1.0],
            vsync: true,
            power_preference: PowerPreferenceConfig::default(),
            backends: Vec::new(),
            request_minimal_limits: true,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("resources/webgpu.txt"),
            number_policy: NumberPolicy::default(),
            index_policy: IndexPolicy::default(),
        }
    }
}

impl LoggingConfig {
    /// Render the configuration as `EnvFilter` directives.
    ///
    /// Known category names are expanded to their `tracing` target; any other
    /// key is passed through so external crates can be tuned as well.
    pub fn filter_directives(&self) -> Result<String> {
        let level = LogLevel::parse(&self.level).ok_or_else(|| {
            LumenError::configuration(format!("Unknown log level '{}'", self.level))
        })?;

        let mut directives = vec![level.to_string()];

        let mut entries: Vec<_> = self.category_levels.iter().collect();
        entries.sort();

        for (category, level_str) in entries {
            let level = LogLevel::parse(level_str).ok_or_else(|| {
                LumenError::configuration(format!(
                    "Unknown log level '{}' for category '{}'",
                    level_str, category
                ))
            })?;
            let target = LogCategory::from_name(category)
                .map(|c| c.as_str())
                .unwrap_or(category.as_str());
            directives.push(format!("{}={}", target, level));
        }

        Ok(directives.join(","))
    }
}

impl GeometryConfig {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            numbers: self.number_policy,
            indices: self.index_policy,
        }
    }
}

impl LumenConfig {
    /// Load configuration from a `.ron` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("ron") => Self::from_ron(&text)?,
            Some("json") => Self::from_json(&text)?,
            _ => {
                return Err(LumenError::configuration(format!(
                    "Unsupported configuration format: {}",
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text)
            .map_err(|e| LumenError::configuration(format!("Invalid RON configuration: {}", e)))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| LumenError::configuration(format!("Invalid JSON configuration: {}", e)))
    }

    /// Check values serde cannot constrain on its own
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(LumenError::configuration(format!(
                "Invalid window size: {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self
            .renderer
            .clear_color
            .iter()
            .any(|channel| !(0.0..=1.0).contains(channel))
        {
            return Err(LumenError::configuration(format!(
                "Clear color channels must be within [0, 1]: {:?}",
                self.renderer.clear_color
            )));
        }

        self.logging.filter_directives()?;
        Ok(())
    }
}
