use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::render::RenderTier;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_grace_millis")]
    pub grace_millis: u64,
    #[serde(default = "default_sound")]
    pub sound: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_render_mode")]
    pub render_mode: String,
    #[serde(default = "default_compact")]
    pub compact: bool,
    #[serde(default = "default_keymap")]
    pub keymap: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_grace_millis() -> u64 {
    250
}
fn default_sound() -> bool {
    true
}
fn default_volume() -> f32 {
    0.8
}
fn default_render_mode() -> String {
    "auto".to_string()
}
fn default_compact() -> bool {
    false
}
fn default_keymap() -> String {
    "default".to_string()
}
fn default_poll_interval_ms() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grace_millis: default_grace_millis(),
            sound: default_sound(),
            volume: default_volume(),
            render_mode: default_render_mode(),
            compact: default_compact(),
            keymap: default_keymap(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pickr")
            .join("config.toml")
    }

    /// Explicit render-tier override, or None for "auto" / unrecognized
    /// values (which fall back to detection).
    pub fn render_override(&self) -> Option<RenderTier> {
        RenderTier::from_name(&self.render_mode)
    }
}
