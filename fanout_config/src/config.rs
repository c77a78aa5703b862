use log::{Level as LogLevel};
use serde::Deserialize;
use url::Url;

use super::environment::Environment;
use super::federation::FederationConfig;
use super::retraction::RetractionConfig;
use super::ConfigError;

fn default_log_level() -> LogLevel { LogLevel::Info }

const fn default_database_connection_pool_size() -> usize { 10 }

#[derive(Clone, Deserialize)]
pub struct Config {
    // Properties auto-populated from the environment
    #[serde(skip)]
    pub environment: Environment,

    #[serde(skip)]
    pub config_path: String,

    // Core settings
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    pub database_url: String,
    #[serde(default = "default_database_connection_pool_size")]
    pub database_connection_pool_size: usize,

    // Domain name or <IP address>:<port>
    // URI scheme is optional
    pub(super) instance_url: String,

    #[serde(default)]
    pub retraction: RetractionConfig,

    #[serde(default)]
    pub federation: FederationConfig,
}

impl Config {
    pub(super) fn try_instance_url(&self) -> Result<Url, ConfigError> {
        let scheme = if self.instance_url.contains("://") {
            ""
        } else {
            "https://"
        };
        let url = Url::parse(&format!("{}{}", scheme, self.instance_url))
            .map_err(|_| ConfigError("invalid instance URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError("instance URL must use HTTP(S)"));
        };
        if url.host_str().is_none() || url.path() != "/" {
            return Err(ConfigError("instance URL must be an origin"));
        };
        Ok(url)
    }

    /// Returns instance URL without trailing slash
    pub fn instance_url(&self) -> String {
        self.try_instance_url()
            .expect("instance URL should be validated")
            .origin()
            .ascii_serialization()
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        self.try_instance_url()?;
        if self.database_connection_pool_size == 0 {
            return Err(ConfigError("database_connection_pool_size must be positive"));
        };
        self.retraction.validate()?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Config {
    pub fn for_test(instance_url: &str) -> Self {
        Self {
            environment: Environment::Development,
            config_path: "config.yaml".to_string(),
            log_level: default_log_level(),
            database_url: "postgres://fanout@127.0.0.1:5432/fanout".to_string(),
            database_connection_pool_size: default_database_connection_pool_size(),
            instance_url: instance_url.to_string(),
            retraction: RetractionConfig::default(),
            federation: FederationConfig::default(),
        }
    }
}
