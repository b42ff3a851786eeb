//! Configuration file handling for glyphcam.
//!
//! Loads configuration from `~/.config/glyphcam/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ascii::{AsciiError, GlyphRamp, Granularity, DEFAULT_GRANULARITY};
use crate::camera::{CameraSettings, Resolution};
use crate::coordinator::DEFAULT_FPS;
use crate::session::SessionOptions;
use crate::still::DEFAULT_MAX_SIDE;

/// Configuration file structure for glyphcam.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub still: StillConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device: u32,
    pub mirror: bool,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            mirror: true,
            width: Resolution::TINY.width,
            height: Resolution::TINY.height,
            fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub granularity: f64,
    /// Ramp name, or a literal glyph string for a custom ramp
    pub ramp: String,
    pub invert: bool,
    pub hide_image: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            ramp: "dense".to_string(),
            invert: false,
            hide_image: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StillConfig {
    pub max_side: u32,
}

impl Default for StillConfig {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
        }
    }
}

/// Written by `glyphcam config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# glyphcam configuration

[camera]
# Camera device index
device = 0
# Mirror live frames horizontally (selfie mode)
mirror = true
# Requested capture size (small is plenty for glyph art)
width = 128
height = 56
# Acquisition cadence
fps = 30

[render]
# Block coarseness: larger = fewer, bigger glyph cells
granularity = 5.0
# Ramp: blocks, simple, classic, dense, detailed, or a literal glyph string
ramp = "dense"
# Map bright pixels to the start of the ramp instead of the end
invert = false
# Hide the image layer beneath the glyphs
hide_image = false

[still]
# Uploaded images are shrunk to this many pixels on the longer side
max_side = 400
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device_index: self.camera.device,
            resolution: Resolution {
                width: self.camera.width,
                height: self.camera.height,
            },
            fps: self.camera.fps,
            mirror: self.camera.mirror,
        }
    }

    /// Session options from the `[render]` and `[still]` sections.
    ///
    /// # Errors
    /// * `AsciiError::InvalidGranularity` / `AsciiError::InvalidRamp` for bad values
    pub fn session_options(&self) -> Result<SessionOptions, AsciiError> {
        Ok(SessionOptions {
            granularity: Granularity::new(self.render.granularity)?,
            ramp: GlyphRamp::parse(&self.render.ramp)?.inverted(self.render.invert),
            hide_image: self.render.hide_image,
            fps: self.camera.fps,
            max_side: self.still.max_side,
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphcam").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphcam/config.toml")
        })
}
