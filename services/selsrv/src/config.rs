//! Service configuration
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! `SELSRV_`-prefixed environment variables (`__` separates nested keys, e.g.
//! `SELSRV_API__PORT=6000`). The bare `PORT` variable still moves the listener
//! when nothing else has changed the port.

use std::path::{Path, PathBuf};

use errors::{SwitchgearError, SwitchgearResult};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "data/switchgear.db";
pub const ENV_PREFIX: &str = "SELSRV_";
/// Environment variable naming the YAML config file
pub const ENV_CONFIG_FILE: &str = "SELSRV_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelsrvConfig {
    pub service: ServiceSection,
    pub api: ApiSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub cors: CorsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level or filter directives, e.g. "info" or "info,selsrv=debug"
    pub level: String,
    pub json: bool,
    /// Daily-rolling log file directory
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "selsrv".to_string(),
        }
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            max_connections: 5,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl SelsrvConfig {
    /// Load from defaults, `file` (or `SELSRV_CONFIG`), and the environment
    pub fn load(file: Option<&Path>) -> SwitchgearResult<Self> {
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from));
        let mut config = Self::load_layers(file.as_deref(), ENV_PREFIX)?;

        let port_is_default = config.api.port == DEFAULT_PORT;
        config.api.port = common::config_loader::get_config_value(
            Some(config.api.port),
            port_is_default,
            "PORT",
            DEFAULT_PORT,
        );

        config.validate()?;
        Ok(config)
    }

    fn load_layers(file: Option<&Path>, env_prefix: &str) -> SwitchgearResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            if !path.exists() {
                return Err(SwitchgearError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config file: {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .map_err(|e| SwitchgearError::config(format!("Failed to load configuration: {}", e)))
    }

    pub fn validate(&self) -> SwitchgearResult<()> {
        if self.api.port == 0 {
            return Err(SwitchgearError::invalid_config(
                "api.port",
                "Port cannot be 0",
            ));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(SwitchgearError::invalid_config(
                "database.path",
                "Database path cannot be empty",
            ));
        }
        if self.database.max_connections == 0 {
            return Err(SwitchgearError::invalid_config(
                "database.max_connections",
                "At least one connection is required",
            ));
        }
        if !common::logging::is_valid_filter(&self.logging.level) {
            return Err(SwitchgearError::invalid_config(
                "logging.level",
                format!("Unparsable log level '{}'", self.logging.level),
            ));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
