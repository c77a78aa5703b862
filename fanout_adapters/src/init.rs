use log::Level;

use fanout_config::{
    parse_config,
    Config,
    SOFTWARE_NAME,
    SOFTWARE_VERSION,
};
use fanout_models::database::{
    connect,
    migrate::apply_migrations,
    BasicDatabaseClient,
    DatabaseConnectionPool,
};

use crate::logger::configure_logger;

pub fn initialize_app(
    override_log_level: Option<Level>,
) -> Config {
    let (config, config_warnings) = parse_config();
    let log_level = override_log_level.unwrap_or(config.log_level);
    configure_logger(log_level);
    log::info!(
        "{} v{}, environment = '{:?}'",
        SOFTWARE_NAME,
        SOFTWARE_VERSION,
        config.environment,
    );
    log::info!("config loaded from {}", config.config_path);
    for warning in config_warnings {
        log::warn!("{}", warning);
    };
    config
}

// Panics on errors
pub async fn create_database_client(config: &Config) -> BasicDatabaseClient {
    connect::create_database_client(&config.database_url)
        .await
        .expect("failed to connect to database")
}

// Panics on errors
pub fn create_database_connection_pool(config: &Config)
    -> DatabaseConnectionPool
{
    let db_pool_size = config.database_connection_pool_size;
    log::info!("database connection pool size: {db_pool_size}");
    connect::create_pool(&config.database_url, db_pool_size)
        .expect("failed to create connection pool")
}

// Panics on errors
pub async fn initialize_database(
    db_client: &mut BasicDatabaseClient,
) -> () {
    let applied_count = apply_migrations(db_client).await
        .expect("failed to apply migrations");
    if applied_count > 0 {
        log::info!("applied {applied_count} migrations");
    };
}
