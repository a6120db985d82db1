use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "EFRAME_PHOTO_CONFIG";

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Tunable constants for the editor.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept on the undo stack
    pub history_capacity: usize,
    /// Lower bound of the zoom factor
    pub min_zoom: f32,
    /// Upper bound of the zoom factor
    pub max_zoom: f32,
    /// Multiplier applied by a single zoom in/out step
    pub zoom_step: f32,
    /// Extension appended when saving to a path without one
    pub default_extension: String,
    /// Radius of the freehand brush in image pixels
    pub brush_radius: u32,
    /// Per-channel tolerance used by the colour pop tool
    pub color_pop_tolerance: u8,
    /// Gaussian sigma used by the blur filter
    pub blur_sigma: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.25,
            default_extension: "jpg".to_owned(),
            brush_radius: 3,
            color_pop_tolerance: 60,
            blur_sigma: 2.0,
        }
    }
}

impl EditorConfig {
    /// Load a config from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config named by [`CONFIG_ENV_VAR`], or the defaults if the
    /// variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        Self::load_or_default(Path::new(&path))
    }

    /// Like [`EditorConfig::load`], but falls back to the defaults with a warning
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Check that the values make sense together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "history_capacity must be at least 1".to_owned(),
            ));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::InvalidValue(format!(
                "zoom range {}..={} is empty or non-positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(ConfigError::InvalidValue(
                "zoom_step must be greater than 1".to_owned(),
            ));
        }
        if self.default_extension.is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_extension must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "history_capacity": 20 }"#).unwrap();
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.default_extension, "jpg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_zoom_range() {
        let config = EditorConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = EditorConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
