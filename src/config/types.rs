use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for the per-request deadline.
pub const MAX_CONTEXT_TIMEOUT_S: u64 = 3600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vertex: VertexConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VertexConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub location: String,
    /// Overrides `https://{location}-aiplatform.googleapis.com`.
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_context_timeout_s")]
    pub context_timeout_s: u64,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl ServerConfig {
    pub fn context_timeout(&self) -> Duration {
        Duration::from_secs(self.context_timeout_s)
    }
}

impl VertexConfig {
    pub fn api_base(&self) -> String {
        match self.api_base.as_deref() {
            Some(base) if !base.is_empty() => base.trim_end_matches('/').to_string(),
            _ => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            context_timeout_s: default_context_timeout_s(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

pub(crate) fn default_context_timeout_s() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
