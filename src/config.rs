//! TOML configuration.
//!
//! Every field has a default, so an absent file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{font_by_name, FontSet, LayoutSettings, FONT_NAMES};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub panel: PanelConfig,
    pub layout: LayoutConfig,
    pub fonts: FontConfig,
    pub feeds: FeedsConfig,
    pub rotation: RotationConfig,
    pub manual: ManualConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: u32,
    pub height: u32,
    /// Where the PNG preview of the last render is written.
    pub preview_path: PathBuf,
}

impl Default for PanelConfig {
    fn default() -> Self {
        // Inky wHAT
        Self {
            width: 400,
            height: 300,
            preview_path: PathBuf::from("static/img/inkyscreen.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding: u32,
    pub block_gap: u32,
    pub hatch_spacing: u32,
    pub hatch_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let d = LayoutSettings::default();
        Self {
            padding: d.padding,
            block_gap: d.block_gap,
            hatch_spacing: d.hatch_spacing,
            hatch_width: d.hatch_width,
        }
    }
}

impl From<&LayoutConfig> for LayoutSettings {
    fn from(c: &LayoutConfig) -> Self {
        Self {
            padding: c.padding,
            block_gap: c.block_gap,
            hatch_spacing: c.hatch_spacing,
            hatch_width: c.hatch_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub quote: String,
    pub headline: String,
    pub body: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            quote: "10x20".into(),
            headline: "9x18_bold".into(),
            body: "8x13".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub sources: Vec<FeedSource>,
    /// Per-feed cap on entries kept from each fetch.
    pub max_entries: usize,
    pub refresh_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            sources: vec![FeedSource {
                url: "https://feeds.bbci.co.uk/news/rss.xml".into(),
                label: "BBC News".into(),
            }],
            max_entries: 10,
            refresh_secs: 600,
        }
    }
}

impl FeedsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Whether the rotation starts running; toggled at runtime with `p`.
    pub enabled: bool,
    pub interval_secs: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
        }
    }
}

impl RotationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Upper-case manually entered text before rendering.
    pub uppercase: bool,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self { uppercase: true }
    }
}

impl Config {
    /// Default location, relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("inkyfeed.toml")
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |message: String| Err(ConfigError::ValidationError { message });

        if self.panel.width == 0 || self.panel.height == 0 {
            return fail(format!(
                "panel size {}x{} must be non-zero",
                self.panel.width, self.panel.height
            ));
        }
        if self.layout.padding >= self.panel.width {
            return fail(format!(
                "padding {} must be smaller than panel width {}",
                self.layout.padding, self.panel.width
            ));
        }
        if self.layout.hatch_spacing == 0 {
            return fail("hatch_spacing must be at least 1".into());
        }
        if self.feeds.refresh_secs == 0 || self.rotation.interval_secs == 0 {
            return fail("refresh and rotation intervals must be at least 1 second".into());
        }
        for name in [&self.fonts.quote, &self.fonts.headline, &self.fonts.body] {
            if font_by_name(name).is_err() {
                return fail(format!(
                    "unknown font '{name}', expected one of: {}",
                    FONT_NAMES.join(", ")
                ));
            }
        }
        Ok(())
    }

    /// Resolve the configured font names.
    pub fn font_set(&self) -> Result<FontSet, ConfigError> {
        FontSet::from_names(&self.fonts.quote, &self.fonts.headline, &self.fonts.body).map_err(
            |e| ConfigError::ValidationError {
                message: e.to_string(),
            },
        )
    }
}
