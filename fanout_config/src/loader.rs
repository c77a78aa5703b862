use std::str::FromStr;

use super::config::Config;
use super::environment::Environment;

struct EnvConfig {
    config_path: String,
    environment: Option<Environment>,
}

#[cfg(feature = "production")]
const DEFAULT_CONFIG_PATH: &str = "/etc/fanout/config.yaml";
#[cfg(not(feature = "production"))]
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn parse_env() -> EnvConfig {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or(DEFAULT_CONFIG_PATH.to_string());
    let environment = std::env::var("ENVIRONMENT").ok()
        .map(|val| Environment::from_str(&val).expect("invalid environment type"));
    EnvConfig {
        config_path,
        environment,
    }
}

/// Parses YAML document and returns config with a list of unknown keys
pub fn parse_config_str(
    config_yaml: &str,
) -> Result<(Config, Vec<String>), serde_yaml::Error> {
    let deserializer = serde_yaml::Deserializer::from_str(config_yaml);
    let mut ignored = vec![];
    let config: Config = serde_ignored::deserialize(deserializer, |path| {
        ignored.push(path.to_string());
    })?;
    Ok((config, ignored))
}

pub fn parse_config() -> (Config, Vec<String>) {
    let env = parse_env();
    let config_yaml = std::fs::read_to_string(&env.config_path)
        .expect("failed to load config file");
    let (mut config, ignored) = parse_config_str(&config_yaml)
        .expect("invalid yaml data");
    let warnings = ignored.into_iter()
        .map(|key| format!("unknown configuration parameter: {key}"))
        .collect();

    // Set parameters from environment
    config.config_path = env.config_path;
    if let Some(environment) = env.environment {
        // Overwrite default only if ENVIRONMENT variable is set
        config.environment = environment;
    };

    if let Err(error) = config.validate() {
        panic!("invalid configuration: {error}");
    };
    (config, warnings)
}
