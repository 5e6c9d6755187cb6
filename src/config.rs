//! Configuration management for Corechat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with CLI overrides.

use crate::cli::Cli;
use crate::error::{CorechatError, Result};
use crate::modes::{ResponseMode, ThinkingDepth};
use crate::providers::ReplyOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Corechat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Assistant provider configuration
    pub provider: ProviderConfig,

    /// Chat behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Telemetry polling configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Provider configuration
///
/// Specifies which assistant provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Local brain server configuration
    #[serde(default)]
    pub local: LocalBrainConfig,
}

/// Local brain server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBrainConfig {
    /// Brain server host
    #[serde(default = "default_brain_host")]
    pub host: String,

    /// Request timeout in seconds
    #[serde(default = "default_brain_timeout")]
    pub timeout_seconds: u64,
}

fn default_brain_host() -> String {
    "http://localhost:8000".to_string()
}

fn default_brain_timeout() -> u64 {
    120
}

impl Default for LocalBrainConfig {
    fn default() -> Self {
        Self {
            host: default_brain_host(),
            timeout_seconds: default_brain_timeout(),
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Default response mode: "standard" or "pro"
    #[serde(default = "default_response_mode")]
    pub default_mode: String,

    /// Default thinking depth: "fast", "balanced", or "deep"
    #[serde(default = "default_thinking_depth")]
    pub default_depth: String,

    /// Base URL used when building share links
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

fn default_response_mode() -> String {
    "standard".to_string()
}

fn default_thinking_depth() -> String {
    "balanced".to_string()
}

fn default_share_base_url() -> String {
    "http://localhost:5173/".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_mode: default_response_mode(),
            default_depth: default_thinking_depth(),
            share_base_url: default_share_base_url(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database path override; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Telemetry polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Scheduler tick interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Seed for the simulated telemetry source
    #[serde(default = "default_telemetry_seed")]
    pub seed: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_telemetry_seed() -> u64 {
    7
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            seed: default_telemetry_seed(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "local".to_string(),
                local: LocalBrainConfig::default(),
            },
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file, applying CLI overrides
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, for overrides
    pub fn load<P: AsRef<Path>>(path: P, cli: &Cli) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str::<Self>(&raw).map_err(CorechatError::Yaml)?
        } else {
            tracing::info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Self::default()
        };

        if let Some(storage_path) = &cli.storage_path {
            config.storage.path = Some(storage_path.clone());
        }

        Ok(config)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any field holds an unusable value.
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "local" {
            return Err(CorechatError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        url::Url::parse(&self.provider.local.host)
            .map_err(|e| CorechatError::Config(format!("Invalid brain host: {}", e)))?;

        if self.provider.local.timeout_seconds == 0 {
            return Err(CorechatError::Config("timeout_seconds must be positive".into()).into());
        }

        ResponseMode::parse_str(&self.chat.default_mode).map_err(CorechatError::Config)?;
        ThinkingDepth::parse_str(&self.chat.default_depth).map_err(CorechatError::Config)?;

        url::Url::parse(&self.chat.share_base_url)
            .map_err(|e| CorechatError::Config(format!("Invalid share base URL: {}", e)))?;

        if self.telemetry.poll_interval_ms == 0 {
            return Err(CorechatError::Config("poll_interval_ms must be positive".into()).into());
        }

        Ok(())
    }

    /// Reply options from the configured defaults
    ///
    /// Call after [`validate`]; unparseable values fall back to the defaults
    /// here rather than failing.
    ///
    /// [`validate`]: Config::validate
    pub fn reply_options(&self) -> ReplyOptions {
        ReplyOptions {
            mode: ResponseMode::parse_str(&self.chat.default_mode)
                .unwrap_or(ResponseMode::Standard),
            thinking_depth: ThinkingDepth::parse_str(&self.chat.default_depth)
                .unwrap_or(ThinkingDepth::Balanced),
        }
    }
}
