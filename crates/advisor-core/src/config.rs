//! Configuration management for the advisor dashboard
//!
//! This module provides the settings loaded from `.advisor/config.toml`:
//! which market to show, how the headline metrics are revealed, where the
//! statistics come from, and where exported reports are written.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{AdvisorError, FetchParams, Result};

/// Workspace-level advisor configuration
///
/// Loaded from `.advisor/config.toml` in the working directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Dashboard behavior and the initial market selection
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// Timing of the headline metric reveal
    #[serde(default)]
    pub reveal: RevealTiming,

    /// Statistics source
    #[serde(default)]
    pub source: SourceConfig,

    /// Report export
    #[serde(default)]
    pub export: ExportConfig,
}

/// Dashboard behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Fetch automatically when the market selection changes.
    /// When false the dashboard never loads and never animates.
    #[serde(default = "default_auto_fetch")]
    pub auto_fetch: bool,

    /// Industry shown on startup
    #[serde(default = "default_industry")]
    pub industry: String,

    /// Optional region filter
    #[serde(default)]
    pub region: Option<String>,

    /// Optional company size bracket
    #[serde(default)]
    pub company_size: Option<String>,

    /// UI event poll interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Timing of the progressive metric reveal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Total duration of one numeric count-up
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Number of discrete steps per count-up
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Delay before a stage starts when real data is present
    #[serde(default = "default_data_ready_delay_ms")]
    pub data_ready_delay_ms: u64,

    /// Delay before a stage starts while showing placeholder zeros
    #[serde(default = "default_placeholder_delay_ms")]
    pub placeholder_delay_ms: u64,

    /// Pause after a stage completes before the next one begins
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Interval between maturity label changes
    #[serde(default = "default_label_cycle_ms")]
    pub label_cycle_ms: u64,
}

/// Where dashboard statistics come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the statistics service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Read snapshots from this JSON file instead of the network
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

/// Report export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported reports are written to
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

// Default value providers
fn default_auto_fetch() -> bool {
    true
}

fn default_industry() -> String {
    "Artificial Intelligence".to_string()
}

fn default_tick_ms() -> u64 {
    16
}

fn default_duration_ms() -> u64 {
    1200
}

fn default_steps() -> u32 {
    60
}

fn default_data_ready_delay_ms() -> u64 {
    50
}

fn default_placeholder_delay_ms() -> u64 {
    300
}

fn default_settle_ms() -> u64 {
    150
}

fn default_label_cycle_ms() -> u64 {
    150
}

fn default_base_url() -> String {
    "http://localhost:8787/api".to_string()
}

fn default_api_key_env() -> String {
    "ADVISOR_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl AdvisorConfig {
    /// Load configuration from `.advisor/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".advisor/config.toml");

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Write default configuration to `.advisor/config.toml`
    pub fn write_default(root: &Path) -> Result<PathBuf> {
        let config_dir = root.join(".advisor");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Fetch parameters for the configured market selection
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            industry: self.dashboard.industry.clone(),
            region: self.dashboard.region.clone(),
            company_size: self.dashboard.company_size.clone(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            auto_fetch: default_auto_fetch(),
            industry: default_industry(),
            region: None,
            company_size: None,
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            steps: default_steps(),
            data_ready_delay_ms: default_data_ready_delay_ms(),
            placeholder_delay_ms: default_placeholder_delay_ms(),
            settle_ms: default_settle_ms(),
            label_cycle_ms: default_label_cycle_ms(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            fixture: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AdvisorConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert!(config.dashboard.auto_fetch);
        assert_eq!(config.reveal.duration_ms, 1200);
        assert_eq!(config.reveal.steps, 60);
    }

    #[test]
    fn test_write_then_load_default() {
        let dir = TempDir::new().unwrap();
        let path = AdvisorConfig::write_default(dir.path()).unwrap();
        assert!(path.ends_with(".advisor/config.toml"));

        let loaded = AdvisorConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded, AdvisorConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".advisor")).unwrap();
        std::fs::write(
            dir.path().join(".advisor/config.toml"),
            "[dashboard]\nauto_fetch = false\nindustry = \"Fintech\"\nregion = \"EMEA\"\n\n[reveal]\nsteps = 10\n",
        )
        .unwrap();

        let config = AdvisorConfig::load_or_default(dir.path()).unwrap();
        assert!(!config.dashboard.auto_fetch);
        assert_eq!(config.reveal.steps, 10);
        assert_eq!(config.reveal.settle_ms, 150);
        assert_eq!(config.fetch_params(), FetchParams::new("Fintech").with_region("EMEA"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[dashboard\n").unwrap();

        let err = AdvisorConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }
}
