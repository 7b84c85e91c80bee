mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Loads the process configuration once at startup.
///
/// A YAML file is read when `CONFIG_PATH` is set; environment variables are
/// applied on top of it.
pub async fn load() -> Result<Config> {
    let mut config = match env::var("CONFIG_PATH") {
        Ok(config_path) => load_file(&config_path).await?,
        Err(_) => Config::default(),
    };

    config.apply_overrides(|key| env::var(key).ok());

    Ok(config)
}

/// Reads a YAML configuration file without applying any overrides.
pub async fn load_file(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Applies environment-style overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup("PROJECT_ID") {
            self.vertex.project_id = project_id;
        }
        if let Some(location) = lookup("LOCATION") {
            self.vertex.location = location;
        }
        if let Some(api_base) = lookup("VERTEX_API_BASE") {
            self.vertex.api_base = Some(api_base);
        }
        if let Some(token) = lookup("VERTEX_ACCESS_TOKEN") {
            self.vertex.access_token = Some(token);
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.server.logs.level = level;
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(
                    "Failed to parse PORT '{}', using {}: {}",
                    port, self.server.port, e
                ),
            }
        }

        if !(1..=MAX_CONTEXT_TIMEOUT_S).contains(&self.server.context_timeout_s) {
            warn!(
                "context_timeout_s must be between 1 and {}, using {} seconds",
                MAX_CONTEXT_TIMEOUT_S,
                default_context_timeout_s()
            );
            self.server.context_timeout_s = default_context_timeout_s();
        }

        match lookup("CONTEXT_TIMEOUT_S") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(seconds) if (1..=MAX_CONTEXT_TIMEOUT_S).contains(&seconds) => {
                    self.server.context_timeout_s = seconds
                }
                Ok(_) => warn!(
                    "CONTEXT_TIMEOUT_S must be between 1 and {}, using {} seconds",
                    MAX_CONTEXT_TIMEOUT_S, self.server.context_timeout_s
                ),
                Err(e) => warn!(
                    "Failed to parse CONTEXT_TIMEOUT_S, using {} seconds: {}",
                    self.server.context_timeout_s, e
                ),
            },
            None => warn!(
                "CONTEXT_TIMEOUT_S not set, using {} seconds",
                self.server.context_timeout_s
            ),
        }
    }
}

impl LogsConfig {
    /// Builds the log filter for the subscriber.
    ///
    /// Non-empty `rust_log` directives win over the configured level.
    pub fn env_filter(&self, rust_log: Option<&str>) -> Result<EnvFilter> {
        if let Some(directives) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
            return EnvFilter::try_new(directives)
                .map_err(|e| Error::config(format!("Invalid RUST_LOG '{}': {}", directives, e)));
        }

        let level = self.level.trim();
        level.parse::<LevelFilter>().map_err(|_| {
            Error::config(format!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            ))
        })?;
        Ok(EnvFilter::new(level))
    }
}
