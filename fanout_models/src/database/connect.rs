use deadpool_postgres::Pool;
use tokio_postgres::config::{Config as DatabaseConfig};

use super::errors::DatabaseError;

pub async fn create_database_client(
    database_url: &str,
) -> Result<tokio_postgres::Client, DatabaseError> {
    let db_config: DatabaseConfig = database_url.parse()?;
    let (client, connection) = db_config.connect(tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            log::error!("connection error: {}", err);
        };
    });
    Ok(client)
}

pub fn create_pool(
    database_url: &str,
    pool_size: usize,
) -> Result<Pool, DatabaseError> {
    let db_config: DatabaseConfig = database_url.parse()?;
    let manager = deadpool_postgres::Manager::new(
        db_config,
        tokio_postgres::NoTls,
    );
    let pool = Pool::builder(manager)
        .max_size(pool_size)
        .build()
        .expect("pool builder should not require runtime");
    Ok(pool)
}
