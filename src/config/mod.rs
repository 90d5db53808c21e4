//! Configuration
//!
//! Layered configuration using Figment: built-in defaults, an optional
//! project `preppy.toml`, then `PREPPY_*` environment variables. The model
//! credential is deliberately NOT part of this file-backed config: it comes
//! from `OPENAI_API_KEY` on server paths or the session store on the
//! static-only path, and is never written to disk.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::constants::{model, server};
use crate::types::{HostingContext, PreppyError, Result};

/// Project config file name, resolved against the working directory
pub const PROJECT_CONFIG_FILE: &str = "preppy.toml";

/// Environment variable prefix (e.g. `PREPPY_SERVER_PORT`)
pub const ENV_PREFIX: &str = "PREPPY_";

// =============================================================================
// Config Types
// =============================================================================

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Active hosting context, read once at startup
    pub hosting: HostingContext,

    /// Embedded server settings
    pub server: ServerConfig,

    /// Model client settings
    pub model: ModelConfig,

    /// Dispatch settings for remote transports
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PreppyError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(PreppyError::Config(format!(
                "Model temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.timeout_secs == 0 {
            return Err(PreppyError::Config(
                "Model timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(PreppyError::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }
        if self.hosting != HostingContext::EmbeddedServer
            && self.dispatch.base_url.is_none()
            && self.hosting != HostingContext::StaticOnly
        {
            return Err(PreppyError::Config(
                "Serverless hosting requires dispatch.base_url".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,

    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: server::DEFAULT_BIND.to_string(),
            port: server::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Chat-completion model name
    pub name: String,

    /// Override for the API base URL (custom/compatible endpoints)
    pub api_base: Option<String>,

    /// Explicit request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: model::DEFAULT_MODEL.to_string(),
            api_base: None,
            timeout_secs: model::DEFAULT_TIMEOUT_SECS,
            temperature: model::DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Base URL for remote transports (embedded server origin or the
    /// serverless deployment origin)
    pub base_url: Option<String>,
}

// =============================================================================
// Loader
// =============================================================================

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration: defaults -> project toml -> env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let project_path = Path::new(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // Only the first underscore separates the section from the field, so
        // keys like PREPPY_MODEL_TIMEOUT_SECS nest as model.timeout_secs.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).map(|key| {
            let key = key.as_str().to_lowercase();
            match key.split_once('_') {
                Some((section, field)) if matches!(section, "server" | "model" | "dispatch") => {
                    format!("{}.{}", section, field).into()
                }
                _ => key.into(),
            }
        }));

        let config: Config = figment
            .extract()
            .map_err(|e| PreppyError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only (plus defaults)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| PreppyError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
