//! Configuration management for the swap coordinator
//!
//! Loads configuration from TOML files with environment variable substitution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkConfig,
    pub coordinator: CoordinatorConfig,
}

/// Swap-matching network (relayer) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the relayer API
    pub base_url: String,
    /// Bearer token, usually injected as ${FUSION_API_KEY}
    pub auth_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorConfig {
    /// Free-text attribution tag sent with every created order
    pub source_tag: String,
    /// Fixed delay between reveal-loop iterations
    pub poll_interval_ms: u64,
    /// Reveal-loop deadline; past this the loop returns an inconclusive
    /// outcome instead of polling forever
    pub max_poll_secs: u64,
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = env::var("FUSION_COORDINATOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config_str = substitute_env_vars(&config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.network.base_url.is_empty() {
            anyhow::bail!("network.base_url must be set");
        }

        if self.network.auth_key.is_empty() {
            tracing::warn!("network.auth_key is empty - relayer calls will likely be rejected");
        }

        if self.coordinator.poll_interval_ms == 0 {
            anyhow::bail!("coordinator.poll_interval_ms must be non-zero");
        }

        if self.coordinator.max_poll_secs == 0 {
            anyhow::bail!("coordinator.max_poll_secs must be non-zero");
        }

        Ok(())
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            source_tag: "fusion-coordinator".to_string(),
            poll_interval_ms: 1_000,
            max_poll_secs: 1_800,
        }
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
