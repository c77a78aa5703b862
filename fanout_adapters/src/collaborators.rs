//! PostgreSQL-backed collaborators of the retraction pipeline.
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value as JsonValue};
use uuid::Uuid;

use fanout_models::{
    background_jobs::{queries::enqueue_jobs, types::JobType},
    database::DatabaseClient,
    posts::queries::{delete_posts, get_posts_by_ids, get_reblogs},
    posts::types::Post,
    profiles::types::DbAccount,
    relationships::queries::get_local_followers,
    streaming::queries::notify_many,
    timelines::queries::delete_home_timeline_entry,
};
use fanout_retraction::{
    collaborators::{
        Channel,
        JobSink,
        PublishChannel,
        Storage,
        TimelineCache,
        TimelineKind,
    },
    errors::ServiceError,
};

pub struct PostgresStorage<'a, C: DatabaseClient + Sync> {
    db_client: &'a C,
}

impl<'a, C: DatabaseClient + Sync> PostgresStorage<'a, C> {
    pub fn new(db_client: &'a C) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl<C: DatabaseClient + Sync> Storage for PostgresStorage<'_, C> {
    async fn load_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<Post>, ServiceError> {
        let posts = get_posts_by_ids(self.db_client, post_ids).await?;
        Ok(posts)
    }

    async fn load_reblogs(
        &self,
        post: &Post,
    ) -> Result<Vec<Post>, ServiceError> {
        let reblogs = get_reblogs(self.db_client, post.id).await?;
        Ok(reblogs)
    }

    async fn delete_by_ids(
        &self,
        post_ids: &[Uuid],
    ) -> Result<u64, ServiceError> {
        let deleted_count = delete_posts(self.db_client, post_ids).await?;
        Ok(deleted_count)
    }

    async fn list_local_followers(
        &self,
        account: &DbAccount,
    ) -> Result<Vec<DbAccount>, ServiceError> {
        let followers = get_local_followers(self.db_client, account.id).await?;
        Ok(followers)
    }
}

/// Home timelines materialized in `home_timeline_entry` table
pub struct PostgresTimelineCache<'a, C: DatabaseClient + Sync> {
    db_client: &'a C,
}

impl<'a, C: DatabaseClient + Sync> PostgresTimelineCache<'a, C> {
    pub fn new(db_client: &'a C) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl<C: DatabaseClient + Sync> TimelineCache for PostgresTimelineCache<'_, C> {
    async fn unpush(
        &self,
        timeline: TimelineKind,
        recipient_id: Uuid,
        post: &Post,
    ) -> Result<(), ServiceError> {
        match timeline {
            TimelineKind::Home => {
                let is_removed = delete_home_timeline_entry(
                    self.db_client,
                    recipient_id,
                    post.id,
                ).await?;
                if !is_removed {
                    log::debug!("post {} is not in timeline of {}", post.id, recipient_id);
                };
            },
        };
        Ok(())
    }
}

fn to_notifications(messages: &[(Channel, &str)]) -> Vec<(String, String)> {
    messages.iter()
        .map(|(channel, payload)| (channel.to_string(), payload.to_string()))
        .collect()
}

/// Live updates delivered with LISTEN/NOTIFY
pub struct PostgresPublishChannel<'a, C: DatabaseClient + Sync> {
    db_client: &'a C,
}

impl<'a, C: DatabaseClient + Sync> PostgresPublishChannel<'a, C> {
    pub fn new(db_client: &'a C) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl<C: DatabaseClient + Sync> PublishChannel for PostgresPublishChannel<'_, C> {
    async fn publish_pipelined(
        &self,
        messages: &[(Channel, &str)],
    ) -> Result<(), ServiceError> {
        let notifications = to_notifications(messages);
        notify_many(self.db_client, &notifications).await?;
        Ok(())
    }
}

pub struct PostgresJobSink<'a, C: DatabaseClient + Sync> {
    db_client: &'a C,
}

impl<'a, C: DatabaseClient + Sync> PostgresJobSink<'a, C> {
    pub fn new(db_client: &'a C) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl<C: DatabaseClient + Sync> JobSink for PostgresJobSink<'_, C> {
    async fn push_bulk(
        &self,
        job_type: JobType,
        jobs_data: Vec<JsonValue>,
    ) -> Result<(), ServiceError> {
        let inserted_count = enqueue_jobs(
            self.db_client,
            job_type,
            &jobs_data,
            Utc::now(),
        ).await?;
        log::debug!("{inserted_count} jobs added to queue ({job_type:?})");
        Ok(())
    }
}
