//! Typed desktop configuration.
//!
//! Every section falls back to its defaults for missing keys, so an empty document is a valid
//! configuration. Semantic checks run after deserialization in [`DesktopConfig::validate`].

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration loading failures.
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },
    /// The document is not valid TOML for [`DesktopConfig`].
    #[error("failed to parse desktop config: {0}")]
    Parse(String),
    /// The document parsed but violates a constraint.
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Icon grid layout parameters.
pub struct GridSettings {
    /// Fixed column count.
    pub columns: u32,
    /// Preferred cell width in pixels; shrinks when the container is narrower.
    pub cell_width: f64,
    /// Cell height in pixels.
    pub cell_height: f64,
    /// Gap between cells in pixels.
    pub gap: f64,
    /// Lower bound for cell extents when the container is tiny.
    pub min_cell_size: f64,
    /// Pointer travel in pixels before a press on an icon becomes a drag.
    pub drag_threshold: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 2,
            cell_width: 100.0,
            cell_height: 100.0,
            gap: 16.0,
            min_cell_size: 48.0,
            drag_threshold: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Window geometry limits and placement defaults.
pub struct WindowSettings {
    /// Minimum window width.
    pub min_width: f64,
    /// Minimum window height.
    pub min_height: f64,
    /// Maximum window width; the viewport width when unset.
    pub max_width: Option<f64>,
    /// Maximum window height; the viewport height minus the taskbar when unset.
    pub max_height: Option<f64>,
    /// Height of the taskbar band at the bottom of the viewport.
    pub taskbar_height: f64,
    /// Width used when neither the request nor the registry names one.
    pub default_width: f64,
    /// Height used when neither the request nor the registry names one.
    pub default_height: f64,
    /// Distance between consecutive cascaded window origins.
    pub cascade_step: f64,
    /// Upper bound on the cascade distance from the centred position.
    pub max_cascade_offset: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            min_height: 200.0,
            max_width: None,
            max_height: None,
            taskbar_height: 48.0,
            default_width: 600.0,
            default_height: 400.0,
            cascade_step: 24.0,
            max_cascade_offset: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Pointer input thresholds.
pub struct InputSettings {
    /// Two presses strictly closer than this many milliseconds may form a double click.
    pub double_click_ms: u64,
    /// Two presses strictly closer than this many pixels may form a double click.
    pub double_click_distance: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            double_click_ms: 500,
            double_click_distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Root desktop configuration.
pub struct DesktopConfig {
    /// Icon grid section.
    pub grid: GridSettings,
    /// Window manager section.
    pub window: WindowSettings,
    /// Pointer input section.
    pub input: InputSettings,
}

impl DesktopConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when a value
    /// is out of range.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file is unreadable, otherwise the errors of
    /// [`DesktopConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.columns == 0 {
            return Err(invalid("grid.columns must be at least 1"));
        }
        positive("grid.cell_width", grid.cell_width)?;
        positive("grid.cell_height", grid.cell_height)?;
        positive("grid.min_cell_size", grid.min_cell_size)?;
        non_negative("grid.gap", grid.gap)?;
        non_negative("grid.drag_threshold", grid.drag_threshold)?;

        let window = &self.window;
        positive("window.min_width", window.min_width)?;
        positive("window.min_height", window.min_height)?;
        positive("window.default_width", window.default_width)?;
        positive("window.default_height", window.default_height)?;
        non_negative("window.taskbar_height", window.taskbar_height)?;
        non_negative("window.cascade_step", window.cascade_step)?;
        non_negative("window.max_cascade_offset", window.max_cascade_offset)?;
        if let Some(max_width) = window.max_width {
            positive("window.max_width", max_width)?;
            if max_width < window.min_width {
                return Err(invalid("window.max_width is smaller than window.min_width"));
            }
        }
        if let Some(max_height) = window.max_height {
            positive("window.max_height", max_height)?;
            if max_height < window.min_height {
                return Err(invalid("window.max_height is smaller than window.min_height"));
            }
        }

        if self.input.double_click_ms == 0 {
            return Err(invalid("input.double_click_ms must be positive"));
        }
        positive("input.double_click_distance", self.input.double_click_distance)
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{key} must be a positive number, got {value}")))
    }
}

fn non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{key} must not be negative, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DesktopConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, DesktopConfig::default());
        assert_eq!(config.grid.columns, 2);
        assert_eq!(config.window.taskbar_height, 48.0);
        assert_eq!(config.input.double_click_ms, 500);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = DesktopConfig::from_toml_str(
            "[grid]\ncolumns = 4\n\n[window]\nmax_width = 900.0\n",
        )
        .expect("partial config");
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.grid.gap, 16.0);
        assert_eq!(config.window.max_width, Some(900.0));
        assert_eq!(config.window.min_width, 200.0);
    }

    #[test]
    fn zero_columns_are_rejected() {
        let err = DesktopConfig::from_toml_str("[grid]\ncolumns = 0\n").expect_err("invalid");
        assert_eq!(
            err,
            ConfigError::Invalid("grid.columns must be at least 1".to_string())
        );
    }

    #[test]
    fn max_below_min_is_rejected() {
        let err = DesktopConfig::from_toml_str("[window]\nmin_height = 300.0\nmax_height = 250.0\n")
            .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("max_height")));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = DesktopConfig::from_toml_str("[grid\ncolumns = 2").expect_err("malformed");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file_as_read_error() {
        let path = std::env::temp_dir().join("desktop-config-does-not-exist.toml");
        let err = DesktopConfig::load(&path).expect_err("missing file");
        assert!(err.to_string().contains("desktop-config-does-not-exist.toml"));
    }
}
