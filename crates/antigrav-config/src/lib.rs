//! Configuration file handling for antigrav.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory, or wherever `ANTIGRAV_CONFIG` points. Every key is optional; a
//! missing file means "use the defaults".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use antigrav_core::FieldSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "ANTIGRAV_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or has values of the wrong type.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Terminal display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Target frames per second.
    pub fps: u32,
    /// Virtual pixels per terminal column.
    pub cell_width_px: f32,
    /// Virtual pixels per terminal row.
    pub cell_height_px: f32,
    /// Show the key help line at the bottom of the screen.
    pub show_help: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            show_help: true,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
    /// Log file; defaults to `antigrav.log` in the platform data directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// Resolved log file path, if one can be determined.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("antigrav.log")))
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldSettings,
    pub display: DisplaySettings,
    pub log: LogSettings,
}

impl Config {
    /// Path of the configuration file: `$ANTIGRAV_CONFIG`, else the platform
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from [`Config::default_path`], falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        let display = &self.display;

        let reals = [
            ("display.cell_width_px", display.cell_width_px),
            ("display.cell_height_px", display.cell_height_px),
            ("field.repulsion_radius", field.repulsion_radius),
            ("field.repulsion_strength", field.repulsion_strength),
            ("field.friction", field.friction),
            ("field.size_min", field.size_min),
            ("field.size_max", field.size_max),
            ("field.rotation_speed_max", field.rotation_speed_max),
            ("field.pulse_rate", field.pulse_rate),
            ("field.pulse_amplitude", field.pulse_amplitude),
            ("field.jitter_rate", field.jitter_rate),
            ("field.jitter_amplitude", field.jitter_amplitude),
            ("field.drift_scale", field.drift_scale),
            ("field.inner_ring", field.inner_ring),
            ("field.outer_ring", field.outer_ring),
        ];
        for (name, value) in reals {
            check(value.is_finite(), name, "must be a finite number")?;
        }

        check(display.fps > 0, "display.fps", "must be at least 1")?;
        check(
            display.cell_width_px > 0.0,
            "display.cell_width_px",
            "must be positive",
        )?;
        check(
            display.cell_height_px > 0.0,
            "display.cell_height_px",
            "must be positive",
        )?;
        check(
            field.particle_count > 0,
            "field.particle_count",
            "must be at least 1",
        )?;
        check(
            field.repulsion_radius > 0.0,
            "field.repulsion_radius",
            "must be positive",
        )?;
        check(
            (0.0..=1.0).contains(&field.friction),
            "field.friction",
            "must be between 0 and 1",
        )?;
        check(
            field.size_min >= 0.0 && field.size_min <= field.size_max,
            "field.size_min",
            "must be non-negative and no larger than field.size_max",
        )?;
        check(
            field.rotation_speed_max >= 0.0,
            "field.rotation_speed_max",
            "must not be negative",
        )?;
        check(
            field.inner_ring >= 0.0 && field.outer_ring >= 0.0,
            "field.inner_ring",
            "spawn ring fractions must not be negative",
        )?;
        Ok(())
    }
}

fn check(ok: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "antigrav", "antigrav")
}
