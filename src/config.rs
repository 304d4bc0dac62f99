//! Configuration files and merge rules.
//!
//! Settings come from three layers: a global JSON file, a local
//! `.markpane.json` in the working directory, and CLI flags. Later layers
//! win field by field.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tabular::Separator;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(clap::ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

/// One configuration layer. `None` means "not set here".
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub separator: Option<Separator>,
    pub debounce_ms: Option<u64>,
    pub ascii_diagrams: Option<bool>,
    pub theme: Option<ThemeMode>,
}

impl ConfigLayer {
    /// Merge `other` over `self`; set fields in `other` take precedence.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            separator: other.separator.or(self.separator),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            ascii_diagrams: other.ascii_diagrams.or(self.ascii_diagrams),
            theme: other.theme.or(self.theme),
        }
    }
}

/// Fully resolved settings after all layers are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub separator: Separator,
    pub debounce_ms: u64,
    pub ascii_diagrams: bool,
    pub theme: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: Separator::Comma,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ascii_diagrams: false,
            theme: ThemeMode::Auto,
        }
    }
}

impl Settings {
    pub fn from_layer(layer: &ConfigLayer) -> Self {
        let defaults = Self::default();
        Self {
            separator: layer.separator.unwrap_or(defaults.separator),
            debounce_ms: layer.debounce_ms.unwrap_or(defaults.debounce_ms),
            ascii_diagrams: layer.ascii_diagrams.unwrap_or(defaults.ascii_diagrams),
            theme: layer.theme.unwrap_or(defaults.theme),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpane").join("config.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpane")
                .join("config.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpane").join("config.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpane")
                .join("config.json");
        }
    }

    PathBuf::from(".markpane.json")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpane.json")
}

/// Load one layer from `path`. A missing file is an empty layer; a file
/// that exists but fails to parse is an error worth surfacing.
pub fn load_layer(path: &Path) -> Result<ConfigLayer> {
    if !path.exists() {
        return Ok(ConfigLayer::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))
}

pub fn save_layer(path: &Path, layer: &ConfigLayer) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(layer).context("Failed to encode config")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Resolve settings from global file, local file, and the CLI layer.
pub fn resolve(cli: &ConfigLayer) -> Settings {
    let global = load_layer(&global_config_path()).unwrap_or_else(|err| {
        tracing::warn!("ignoring global config: {err:#}");
        ConfigLayer::default()
    });
    let local = load_layer(&local_override_path()).unwrap_or_else(|err| {
        tracing::warn!("ignoring local config: {err:#}");
        ConfigLayer::default()
    });
    Settings::from_layer(&global.union(&local).union(cli))
}
