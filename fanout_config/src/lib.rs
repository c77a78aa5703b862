mod config;
mod environment;
mod federation;
mod loader;
mod retraction;

pub use config::Config;
pub use environment::Environment;
pub use federation::FederationConfig;
pub use loader::{parse_config, parse_config_str};
pub use retraction::RetractionConfig;

pub const SOFTWARE_NAME: &str = "Fanout";
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct ConfigError(&'static str);
