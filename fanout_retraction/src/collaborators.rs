//! Interfaces of the services used by the retraction pipeline.
use std::fmt;

use async_trait::async_trait;
use serde_json::{Value as JsonValue};
use uuid::Uuid;

use fanout_models::{
    background_jobs::types::JobType,
    posts::types::Post,
    profiles::types::DbAccount,
};

use crate::errors::ServiceError;
use crate::types::RetractionUnit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineKind {
    Home,
}

/// Live update channel
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Channel {
    Public,
    PublicLocal,
    Hashtag(String),
    HashtagLocal(String),
}

impl fmt::Display for Channel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(formatter, "timeline:public"),
            Self::PublicLocal => write!(formatter, "timeline:public:local"),
            Self::Hashtag(tag) => write!(formatter, "timeline:hashtag:{tag}"),
            Self::HashtagLocal(tag) => {
                write!(formatter, "timeline:hashtag:{tag}:local")
            },
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Loads posts with authors, stream entries, mentions and tags.
    /// Missing posts are skipped.
    async fn load_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<Post>, ServiceError>;

    async fn load_reblogs(
        &self,
        post: &Post,
    ) -> Result<Vec<Post>, ServiceError>;

    /// Deletes posts together with their reblogs and stream entries
    async fn delete_by_ids(
        &self,
        post_ids: &[Uuid],
    ) -> Result<u64, ServiceError>;

    async fn list_local_followers(
        &self,
        account: &DbAccount,
    ) -> Result<Vec<DbAccount>, ServiceError>;
}

#[async_trait]
pub trait TimelineCache: Send + Sync {
    /// Removing a post that is not in the timeline is not an error
    async fn unpush(
        &self,
        timeline: TimelineKind,
        recipient_id: Uuid,
        post: &Post,
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait PublishChannel: Send + Sync {
    async fn publish(
        &self,
        channel: &Channel,
        payload: &str,
    ) -> Result<(), ServiceError> {
        let messages = [(channel.clone(), payload)];
        self.publish_pipelined(&messages).await
    }

    /// Sends all messages in one round-trip
    async fn publish_pipelined(
        &self,
        messages: &[(Channel, &str)],
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait JobSink: Send + Sync {
    async fn push_bulk(
        &self,
        job_type: JobType,
        jobs_data: Vec<JsonValue>,
    ) -> Result<(), ServiceError>;
}

pub trait PayloadEncoder: Send + Sync {
    fn encode_deletion_event(&self, post_id: Uuid) -> RetractionUnit {
        RetractionUnit::deletion_event(post_id)
    }

    fn render_federation_payload(&self, post: &Post) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Public.to_string(), "timeline:public");
        assert_eq!(Channel::PublicLocal.to_string(), "timeline:public:local");
        assert_eq!(
            Channel::Hashtag("rust".to_string()).to_string(),
            "timeline:hashtag:rust",
        );
        assert_eq!(
            Channel::HashtagLocal("rust".to_string()).to_string(),
            "timeline:hashtag:rust:local",
        );
    }
}
