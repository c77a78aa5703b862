use anyhow::Error;

use fanout_config::Config;
use fanout_models::{
    background_jobs::{
        queries::{delete_job_from_queue, get_job_batch},
        types::JobType,
    },
    database::{get_database_client, DatabaseConnectionPool},
};

use super::removal::{remove_posts_with_database, RemovePostsJobData};

/// Processes queued removal requests.
/// Failed jobs stay in the queue and are claimed again after timeout.
pub async fn retraction_queue_executor(
    config: &Config,
    db_pool: &DatabaseConnectionPool,
) -> Result<(), Error> {
    let db_client = &mut **get_database_client(db_pool).await?;
    let batch = get_job_batch(
        db_client,
        JobType::RemovePosts,
        config.retraction.queue_batch_size,
        config.retraction.job_timeout,
    ).await?;
    for job in batch {
        let job_data: RemovePostsJobData =
            match serde_json::from_value(job.job_data) {
                Ok(job_data) => job_data,
                Err(error) => {
                    log::error!("invalid job data ({}): {}", job.id, error);
                    delete_job_from_queue(db_client, job.id).await?;
                    continue;
                },
            };
        match remove_posts_with_database(
            config,
            db_client,
            &job_data.post_ids,
        ).await {
            Ok(report) => {
                log::info!("removal job {} completed: {:?}", job.id, report);
                delete_job_from_queue(db_client, job.id).await?;
            },
            Err(error) => {
                log::error!("removal job {} failed: {}", job.id, error);
            },
        };
    };
    Ok(())
}
