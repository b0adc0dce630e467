//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section has defaults, so a partial file (or none at all) still yields a
//! usable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::gesture::SwipeConfig;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: GeneralConfig,
    pub storage: StorageConfig,
    pub gesture: GestureConfig,
    pub cues: CueConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub name: String,
    /// Label shown next to amounts. No conversion is ever done.
    pub currency: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "bet-tracker".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".bet-tracker"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GestureConfig {
    pub max_offset_px: f64,
    pub swipe_threshold_px: f64,
    pub velocity_threshold_px_per_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let swipe = SwipeConfig::default();
        Self {
            max_offset_px: swipe.max_offset,
            swipe_threshold_px: swipe.swipe_threshold,
            velocity_threshold_px_per_ms: swipe.velocity_threshold,
        }
    }
}

impl GestureConfig {
    pub fn swipe(&self) -> SwipeConfig {
        SwipeConfig {
            max_offset: self.max_offset_px,
            swipe_threshold: self.swipe_threshold_px,
            velocity_threshold: self.velocity_threshold_px_per_ms,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CueConfig {
    /// How long a win/loss cue stays up.
    pub duration_ms: u64,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self { duration_ms: 3000 }
    }
}

impl CueConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8787,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        if !(g.max_offset_px > 0.0) {
            anyhow::bail!("gesture.max_offset_px must be positive");
        }
        if !(g.swipe_threshold_px >= 0.0 && g.swipe_threshold_px <= g.max_offset_px) {
            anyhow::bail!("gesture.swipe_threshold_px must be between 0 and max_offset_px");
        }
        if !(g.velocity_threshold_px_per_ms > 0.0) {
            anyhow::bail!("gesture.velocity_threshold_px_per_ms must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.currency, "USD");
        assert_eq!(cfg.gesture.swipe(), SwipeConfig::default());
        assert_eq!(cfg.cues.duration(), Duration::from_millis(3000));
        assert!(!cfg.dashboard.enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg = AppConfig::parse(
            r#"
            [gesture]
            swipe_threshold_px = 40.0

            [dashboard]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gesture.swipe_threshold_px, 40.0);
        assert_eq!(cfg.gesture.max_offset_px, 80.0);
        assert!(cfg.dashboard.enabled);
        assert_eq!(cfg.dashboard.port, 8787);
        assert_eq!(cfg.storage.data_dir, PathBuf::from(".bet-tracker"));
    }

    #[test]
    fn test_rejects_threshold_beyond_affordance() {
        let err = AppConfig::parse(
            r#"
            [gesture]
            max_offset_px = 60.0
            swipe_threshold_px = 90.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("swipe_threshold_px"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(AppConfig::parse("[gesture\nmax_offset_px = ").is_err());
    }

    #[test]
    fn test_load_repo_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
        let cfg = AppConfig::load(path).expect("shipped config.toml should load");
        assert_eq!(cfg.app.name, "bet-tracker");
        assert_eq!(cfg.gesture.max_offset_px, 80.0);
        assert_eq!(cfg.gesture.swipe_threshold_px, 50.0);
        assert_eq!(cfg.cues.duration_ms, 3000);
        assert!(!cfg.dashboard.enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = AppConfig::load_or_default("/tmp/bet_tracker_no_such_config.toml").unwrap();
        assert_eq!(cfg.cues.duration_ms, 3000);
    }
}
