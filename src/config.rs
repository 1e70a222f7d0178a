// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::drivers::CaptureVariant;
pub const CONFIG_ENV: &str = "OWONSCOPE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "owonscope.json";
/// Variant names as they appear in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimVariant {
    OneChannel1k,
    OneChannel10k,
    TwoChannel1k,
    TwoChannel10k,
}
impl From<SimVariant> for CaptureVariant {
    fn from(v: SimVariant) -> Self {
        match v {
            SimVariant::OneChannel1k => CaptureVariant::OneChannel1k,
            SimVariant::OneChannel10k => CaptureVariant::OneChannel10k,
            SimVariant::TwoChannel1k => CaptureVariant::TwoChannel1k,
            SimVariant::TwoChannel10k => CaptureVariant::TwoChannel10k,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Empty means "ask in the connection panel".
    pub host: String,
    pub port: u16,
    pub read_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub simulation_variant: SimVariant,
    /// Fraction of simulated frames that arrive truncated.
    pub simulation_truncate_chance: f64,
}
impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3000,
            read_timeout_ms: 100,
            connect_timeout_ms: 3000,
            simulation_variant: SimVariant::OneChannel1k,
            simulation_truncate_chance: 0.0,
        }
    }
}
impl ScopeConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.max(1))
    }
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }
    /// `$OWONSCOPE_CONFIG`, falling back to `owonscope.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
    /// A missing file gives the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
