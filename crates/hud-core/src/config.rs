//! Configuration management for the HUD.
//!
//! Loads configuration from ${HUD_HOME}/config.toml with sensible defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `hud_ui=debug`.
    pub filter: String,
    /// Write logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Inventory grid limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Number of addressable slots (5x4 grid by default).
    pub max_slots: usize,
    /// Carry limit used until the host sends one.
    pub max_weight: f64,
}

impl InventoryConfig {
    pub const DEFAULT_MAX_SLOTS: usize = 20;
    pub const DEFAULT_MAX_WEIGHT: f64 = 50.0;
    pub const SLOT_LIMIT: usize = 256;
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_slots: Self::DEFAULT_MAX_SLOTS,
            max_weight: Self::DEFAULT_MAX_WEIGHT,
        }
    }
}

/// Per-panel overrides for the built-in panel registrations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<bool>,
    /// Host actions that open the panel (replaces the built-in list).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

/// HUD configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub inventory: InventoryConfig,
    /// Keyed by panel name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub panels: BTreeMap<String, PanelOverride>,
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };
        config
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let slots = self.inventory.max_slots;
        if slots == 0 || slots > InventoryConfig::SLOT_LIMIT {
            bail!(
                "inventory.max_slots must be between 1 and {}, got {slots}",
                InventoryConfig::SLOT_LIMIT
            );
        }
        let weight = self.inventory.max_weight;
        if !weight.is_finite() || weight <= 0.0 {
            bail!("inventory.max_weight must be a positive number, got {weight}");
        }
        for (name, panel) in &self.panels {
            if let Some(actions) = &panel.actions
                && actions.iter().any(|a| a.trim().is_empty())
            {
                bail!("panels.{name}.actions contains an empty action name");
            }
        }
        Ok(())
    }

    /// Writes the commented default template to `path`.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Serializes the default configuration.
    pub fn generate() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")
    }

    /// Override for a built-in panel, if configured.
    pub fn panel(&self, name: &str) -> Option<&PanelOverride> {
        self.panels.get(name)
    }
}

pub mod paths {
    //! Path resolution for HUD configuration.
    //!
    //! `HUD_HOME` resolution order:
    //! 1. `HUD_HOME` environment variable (if set)
    //! 2. ~/.config/hud (default)
    //! 3. ./.hud when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the HUD home directory.
    pub fn hud_home() -> PathBuf {
        if let Ok(home) = std::env::var("HUD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".hud"),
            |h| h.join(".config").join("hud"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        hud_home().join("config.toml")
    }
}
