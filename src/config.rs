// filepath: src/config.rs
//! Configuration handling for wl-paint
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! The PaintConfig struct contains all configurable parameters.

use crate::export::ImageFormat;
use crate::store::RedoPolicy;
use crate::stroke::Rgba;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 10;
/// Largest canvas edge accepted from the config file
pub const MAX_CANVAS_SIZE: u32 = 8192;

/// Canvas size and background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgba::WHITE,
        }
    }
}

/// Initial brush state and the colors the user can cycle through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub color: Rgba,
    pub size: u32,
    pub palette: Vec<Rgba>,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            size: 5,
            palette: vec![
                Rgba::BLACK,
                Rgba::new(255, 175, 175, 255), // pink
                Rgba::new(220, 40, 40, 255),
                Rgba::new(40, 160, 60, 255),
                Rgba::new(40, 80, 220, 255),
                Rgba::new(250, 200, 30, 255),
                Rgba::WHITE,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory saved images go to; the current directory when unset
    pub directory: Option<PathBuf>,
    pub format: ImageFormat,
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir(),
            format: ImageFormat::Png,
            file_prefix: "drawing".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryConfig {
    pub clear_redo_on_new_stroke: bool,
}

impl HistoryConfig {
    pub fn redo_policy(&self) -> RedoPolicy {
        if self.clear_redo_on_new_stroke {
            RedoPolicy::ClearOnNewStroke
        } else {
            RedoPolicy::Keep
        }
    }
}

/// Configuration for the paint window and its tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaintConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub brush: BrushConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl PaintConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("wl-paint")
        } else {
            PathBuf::from(".config/wl-paint")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from the default location, writing defaults if missing
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::get_config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                Ok(config.sanitized())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default_config = Self::default();
                default_config.save_to_path(config_path)?;
                Ok(default_config)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !Path::exists(parent) {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// Bytes needed for one ARGB8888 buffer of the canvas
    pub fn pool_size(&self) -> Option<usize> {
        (self.canvas.width as usize)
            .checked_mul(self.canvas.height as usize)?
            .checked_mul(4)
    }

    /// Clamp values a hand-edited file may have pushed out of range
    pub fn sanitized(mut self) -> Self {
        self.brush.size = self.brush.size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        self.canvas.width = self.canvas.width.clamp(1, MAX_CANVAS_SIZE);
        self.canvas.height = self.canvas.height.clamp(1, MAX_CANVAS_SIZE);
        // The canvas is opaque; JPEG export has nowhere to keep alpha
        self.canvas.background.a = 255;
        if self.brush.palette.is_empty() {
            self.brush.palette.push(self.brush.color);
        }
        self
    }
}
