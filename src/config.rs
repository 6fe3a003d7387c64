//! User settings.
//!
//! Settings live in `settings.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/zcalc/settings.toml` on Linux). A missing file is
//! created with defaults on first start.
//!
//! ```toml
//! appearance = "system"       # "light", "dark" or "system"
//! default_mode = "standard"   # "standard", "programming" or "scientific"
//! on_top = false              # keep the window above others
//! opacity = 0.9               # window opacity (0.1-1.0)
//! ```
//!
//! Only `default_mode` reaches the calculator core; the rest belongs to the
//! presentation layer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::CalcMode;

pub const SETTINGS_FILE: &str = "settings.toml";

const OPACITY_RANGE: std::ops::RangeInclusive<f32> = 0.1..=1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub appearance: Appearance,
    pub default_mode: CalcMode,
    pub on_top: bool,
    pub opacity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appearance: Appearance::default(),
            default_mode: CalcMode::default(),
            on_top: false,
            opacity: 0.9,
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("zcalc").join(SETTINGS_FILE))
    }

    /// Load settings from `path`, writing defaults there if the file does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            info!(path = %path.display(), "created default settings");
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        settings.validate()?;

        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Write the settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    /// Update a single setting from its textual value.
    ///
    /// The settings are left untouched if the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let mut updated = self.clone();
        match key {
            "appearance" => {
                updated.appearance = match value.to_ascii_lowercase().as_str() {
                    "light" => Appearance::Light,
                    "dark" => Appearance::Dark,
                    "system" => Appearance::System,
                    other => bail!("Invalid appearance '{other}' (expected light, dark or system)"),
                }
            }
            "default_mode" => {
                updated.default_mode = value.parse().map_err(anyhow::Error::msg)?;
            }
            "on_top" => {
                updated.on_top = value
                    .parse()
                    .with_context(|| format!("Invalid on_top '{value}' (expected true or false)"))?;
            }
            "opacity" => {
                updated.opacity = value
                    .parse()
                    .with_context(|| format!("Invalid opacity '{value}'"))?;
            }
            other => bail!("Unknown setting '{other}'"),
        }
        updated.validate()?;

        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !OPACITY_RANGE.contains(&self.opacity) {
            bail!(
                "Opacity {} is out of range ({}-{})",
                self.opacity,
                OPACITY_RANGE.start(),
                OPACITY_RANGE.end()
            );
        }
        Ok(())
    }
}
