use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::{Brush, BrushId, PressureSettings};

/// Environment variable naming the JSON config file
pub const CONFIG_ENV: &str = "PAINTER_CANVAS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Brush settings as they appear in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub name: String,
    pub size: PressureSettings,
    pub flow: PressureSettings,
    /// sRGB
    pub color: [u8; 3],
}

impl Default for BrushConfig {
    fn default() -> Self {
        let brush = Brush::default();
        Self {
            name: brush.name,
            size: brush.size,
            flow: brush.flow,
            color: [0, 0, 255],
        }
    }
}

impl BrushConfig {
    pub fn to_brush(&self) -> Brush {
        Brush {
            id: BrushId::new(),
            name: self.name.clone(),
            size: self.size,
            flow: self.flow,
        }
    }

    pub fn color(&self) -> Color32 {
        let [r, g, b] = self.color;
        Color32::from_rgb(r, g, b)
    }
}

/// Settings for the canvas and its host window.
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Pressure reported for devices without a pressure axis (mice, most touch screens)
    pub default_pressure: f32,
    pub brush: BrushConfig,
    /// Where the document is loaded from on start and saved to on shutdown
    pub document_path: Option<PathBuf>,
    /// env_logger filter used when `RUST_LOG` is not set
    pub log_filter: String,
    pub window_size: [f32; 2],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_pressure: 1.0,
            brush: BrushConfig::default(),
            document_path: None,
            log_filter: "info".to_string(),
            window_size: [1024.0, 768.0],
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by [`CONFIG_ENV`], or the defaults when the
    /// variable is unset. A broken file is reported and replaced by defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using default config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_pressure) {
            return Err(ConfigError::Invalid(format!(
                "default_pressure {} outside [0, 1]",
                self.default_pressure
            )));
        }
        if self.brush.size.min_value < 0.0 || self.brush.size.max_value < 0.0 {
            return Err(ConfigError::Invalid("brush size must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CanvasConfig::from_json_str(r#"{ "default_pressure": 0.5 }"#).unwrap();
        assert_eq!(config.default_pressure, 0.5);
        assert_eq!(config.brush, BrushConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_nested_brush_settings() {
        let config = CanvasConfig::from_json_str(
            r#"{ "brush": { "size": { "min_value": 0.01, "max_value": 0.05 }, "color": [255, 0, 0] } }"#,
        )
        .unwrap();
        assert_eq!(config.brush.size, PressureSettings::new(0.01, 0.05));
        assert_eq!(config.brush.color(), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_rejects_out_of_range_pressure() {
        let result = CanvasConfig::from_json_str(r#"{ "default_pressure": 3.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result = CanvasConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
