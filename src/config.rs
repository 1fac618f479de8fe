//! Application configuration management.
//!
//! This module handles the persistent user preferences for epk-studio: the
//! starting volume of players, thumbnail generation settings, and which kit
//! file to open by default. Configuration is stored in the user's config
//! directory (typically ~/.config/epk/config.toml). A missing file means
//! defaults.

use crate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_THUMBNAIL_SIZE, DEFAULT_VOLUME, KIT_FILE};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Substring a source photo's file name must contain to be processed
    #[serde(default)]
    pub photo_filter: String,
    #[serde(default = "default_kit_file")]
    pub kit_file: String,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_kit_file() -> String {
    KIT_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            default_volume: default_volume(),
            thumbnail_size: default_thumbnail_size(),
            jpeg_quality: default_jpeg_quality(),
            photo_filter: String::new(),
            kit_file: default_kit_file(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("epk")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("epk")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Kit file path with `~` expanded
    pub fn kit_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.kit_file).as_ref())
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err("default_volume must be between 0 and 1".into());
        }
        if self.thumbnail_size == 0 {
            return Err("thumbnail_size must be greater than 0".into());
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".into());
        }
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let mut updated = self.clone();
        match key {
            "default_volume" => {
                updated.default_volume = value
                    .parse::<f32>()
                    .map_err(|_| "Value must be a number between 0 and 1")?;
            }
            "thumbnail_size" => {
                updated.thumbnail_size = value
                    .parse::<u32>()
                    .map_err(|_| "Value must be a positive whole number of pixels")?;
            }
            "jpeg_quality" => {
                updated.jpeg_quality = value
                    .parse::<u8>()
                    .map_err(|_| "Value must be a whole number between 1 and 100")?;
            }
            "photo_filter" => updated.photo_filter = value.to_string(),
            "kit_file" => updated.kit_file = value.to_string(),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
