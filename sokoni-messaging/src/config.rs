//! Messaging Configuration
//!
//! Polling cadences and UI thresholds, stored as TOML under the platform
//! config directory. Every field has a serde default so a partial file
//! (or none at all) yields a working configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Thread list poll interval in seconds
    #[serde(default = "default_thread_poll_secs")]
    pub thread_poll_secs: u64,

    /// Active conversation poll interval in seconds
    #[serde(default = "default_conversation_poll_secs")]
    pub conversation_poll_secs: u64,

    /// Distance from the transcript bottom, in px, within which the
    /// reader counts as pinned
    #[serde(default = "default_pin_threshold_px")]
    pub pin_threshold_px: f32,

    /// Maximum message body length in characters
    #[serde(default = "default_max_body_len")]
    pub max_body_len: usize,
}

fn default_thread_poll_secs() -> u64 {
    15
}

fn default_conversation_poll_secs() -> u64 {
    5
}

fn default_pin_threshold_px() -> f32 {
    120.0
}

fn default_max_body_len() -> usize {
    2000
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            thread_poll_secs: default_thread_poll_secs(),
            conversation_poll_secs: default_conversation_poll_secs(),
            pin_threshold_px: default_pin_threshold_px(),
            max_body_len: default_max_body_len(),
        }
    }
}

impl MessagingConfig {
    /// Default config file path under the platform config directory
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("sokoni").join("messaging.toml"))
    }

    /// Load configuration from `path`, using defaults when the file
    /// does not exist
    pub fn load(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn thread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.thread_poll_secs)
    }

    pub fn conversation_poll_interval(&self) -> Duration {
        Duration::from_secs(self.conversation_poll_secs)
    }
}
