//! User settings — loads optional ~/.cantus/settings.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_tempo() -> f64 {
    120.0
}

/// Settings loaded from ~/.cantus/settings.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Render worker threads. 0 lets rayon decide.
    #[serde(default)]
    pub threads: usize,
    /// Base tempo for scores that do not set one.
    #[serde(default = "default_tempo")]
    pub default_tempo: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threads: 0,
            default_tempo: default_tempo(),
        }
    }
}

/// Default settings file path.
pub fn settings_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".cantus");
    path.push("settings.yaml");
    path
}

/// Load settings from the default path.
pub fn load_settings() -> Result<Settings, io::Error> {
    load_settings_from(&settings_path())
}

/// Load settings from a YAML file. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, io::Error> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
