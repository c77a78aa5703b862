use refinery::Error;
use tokio_postgres::Client;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies pending schema migrations and returns their number
pub async fn apply_migrations(db_client: &mut Client) -> Result<usize, Error> {
    let report = embedded::migrations::runner()
        .set_abort_divergent(true)
        .run_async(db_client)
        .await?;
    let applied = report.applied_migrations();
    for migration in applied {
        log::info!(
            "schema migrated to version {} ({})",
            migration.version(),
            migration.name(),
        );
    };
    Ok(applied.len())
}
