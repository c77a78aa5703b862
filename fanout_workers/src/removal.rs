use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fanout_adapters::collaborators::{
    PostgresJobSink,
    PostgresPublishChannel,
    PostgresStorage,
    PostgresTimelineCache,
};
use fanout_config::Config;
use fanout_models::{
    background_jobs::{queries::enqueue_job, types::JobType},
    database::{DatabaseClient, DatabaseError},
};
use fanout_retraction::{
    activitypub::ActivityPubEncoder,
    errors::{RetractionError, ServiceError},
    remove_posts,
    types::RetractionReport,
    Collaborators,
};

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct RemovePostsJobData {
    pub post_ids: Vec<Uuid>,
}

impl RemovePostsJobData {
    pub async fn into_job(
        self,
        db_client: &impl DatabaseClient,
    ) -> Result<(), DatabaseError> {
        let job_data = serde_json::to_value(self)
            .expect("job data should be serializable");
        let scheduled_for = Utc::now(); // run immediately
        enqueue_job(
            db_client,
            JobType::RemovePosts,
            &job_data,
            scheduled_for,
        ).await?;
        Ok(())
    }
}

fn storage_failure(error: impl Into<DatabaseError>) -> RetractionError {
    RetractionError::StorageFailure(ServiceError::from(error.into()))
}

/// Runs retraction pipeline with database-backed collaborators.
/// Deletions are committed only if all follow-up jobs were queued.
pub async fn remove_posts_with_database(
    config: &Config,
    db_client: &mut impl DatabaseClient,
    post_ids: &[Uuid],
) -> Result<RetractionReport, RetractionError> {
    let transaction = db_client.transaction().await.map_err(storage_failure)?;
    let storage = PostgresStorage::new(&transaction);
    let timelines = PostgresTimelineCache::new(&transaction);
    let channel = PostgresPublishChannel::new(&transaction);
    let job_sink = PostgresJobSink::new(&transaction);
    let encoder = ActivityPubEncoder::new(&config.instance_url());
    let collaborators = Collaborators {
        storage: &storage,
        timelines: &timelines,
        channel: &channel,
        job_sink: &job_sink,
        encoder: &encoder,
    };
    let report = remove_posts(
        &config.retraction,
        &config.federation,
        &collaborators,
        post_ids,
    ).await?;
    transaction.commit().await.map_err(storage_failure)?;
    Ok(report)
}
