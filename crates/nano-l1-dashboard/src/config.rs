/*
[INPUT]:  Built-in defaults, optional YAML file, NANO_L1_* environment variables
[OUTPUT]: Validated DashboardConfig
[POS]:    Configuration layer - feed endpoint, reconnection, UI cadence
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use nano_l1_feed::{DEFAULT_ENDPOINT, parse_endpoint};

pub const ENV_PREFIX: &str = "NANO_L1";

/// Top-level configuration for the dashboard
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Feed WebSocket endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Caller-side reconnection policy (the adapter itself never reconnects)
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Render cadence
    #[serde(default)]
    pub ui: UiConfig,
}

/// Reconnection configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReconnectConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Keep the derived state across reconnects instead of starting empty
    #[serde(default = "default_resume_state")]
    pub resume_state: bool,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: default_max_retries(),
            resume_state: default_resume_state(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Interval between summaries in headless mode
    #[serde(default = "default_report_secs")]
    pub report_secs: u64,
}

impl UiConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_secs.max(1))
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            report_secs: default_report_secs(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect: ReconnectConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_retries() -> u32 {
    10
}

fn default_resume_state() -> bool {
    true
}

fn default_tick_ms() -> u64 {
    250
}

fn default_report_secs() -> u64 {
    5
}

impl DashboardConfig {
    /// Layer defaults, an optional file and the process environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, env_source())
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(env)
            .build()
            .context("build configuration")?
            .try_deserialize()
            .context("deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> anyhow::Result<Self> {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        parse_endpoint(&self.endpoint).context("invalid endpoint")?;
        Ok(())
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
