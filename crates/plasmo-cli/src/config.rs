//! Configuration management for Plasmo CLI.

use anyhow::{Context, Result};
use plasmo::prelude::{Scenario, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plasmo project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Defaults for `plasmo run` and `plasmo resume`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    #[serde(default = "default_connectivity")]
    pub connectivity: f64,
    #[serde(default = "default_scenario")]
    pub scenario: Scenario,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

// Default value functions
fn default_node_count() -> usize { 24 }
fn default_connectivity() -> f64 { 0.2 }
fn default_scenario() -> Scenario { Scenario::Balanced }
fn default_ticks() -> u64 { 600 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            connectivity: default_connectivity(),
            scenario: default_scenario(),
            ticks: default_ticks(),
        }
    }
}

impl Config {
    /// Load config from plasmo.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .simulation
            .validate()
            .with_context(|| format!("Invalid [simulation] in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find plasmo.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join("plasmo.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Get the Plasmo data directory (.plasmo/).
pub fn data_dir() -> Result<PathBuf> {
    let dir = std::env::current_dir()?.join(".plasmo");
    Ok(dir)
}

/// Get the current session file path.
pub fn current_session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("current.json"))
}
