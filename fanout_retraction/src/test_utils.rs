//! In-memory collaborators for tests.
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value as JsonValue};
use uuid::Uuid;

use fanout_models::{
    background_jobs::types::JobType,
    posts::types::Post,
    profiles::types::DbAccount,
};

use crate::activitypub::ActivityPubEncoder;
use crate::collaborators::{
    Channel,
    JobSink,
    PayloadEncoder,
    PublishChannel,
    Storage,
    TimelineCache,
    TimelineKind,
};
use crate::errors::ServiceError;

pub struct MemoryStorage {
    posts: Mutex<Vec<Post>>,
    followers: Vec<(Uuid, DbAccount)>,
    deletion_batches: Mutex<Vec<Vec<Uuid>>>,
    is_deletion_failing: bool,
}

impl MemoryStorage {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            followers: vec![],
            deletion_batches: Mutex::new(vec![]),
            is_deletion_failing: false,
        }
    }

    pub fn with_failing_deletion(mut self) -> Self {
        self.is_deletion_failing = true;
        self
    }

    pub fn add_follower(&mut self, target: &DbAccount, follower: &DbAccount) -> () {
        self.followers.push((target.id, follower.clone()));
    }

    pub fn deletion_batches(&self) -> Vec<Vec<Uuid>> {
        self.deletion_batches.lock().unwrap().clone()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<Post>, ServiceError> {
        let posts = self.posts.lock().unwrap();
        let loaded = post_ids.iter()
            .filter_map(|post_id| posts.iter().find(|post| post.id == *post_id))
            .cloned()
            .collect();
        Ok(loaded)
    }

    async fn load_reblogs(
        &self,
        post: &Post,
    ) -> Result<Vec<Post>, ServiceError> {
        let posts = self.posts.lock().unwrap();
        let reblogs = posts.iter()
            .filter(|reblog| reblog.reblog_of_id == Some(post.id))
            .cloned()
            .collect();
        Ok(reblogs)
    }

    async fn delete_by_ids(
        &self,
        post_ids: &[Uuid],
    ) -> Result<u64, ServiceError> {
        if self.is_deletion_failing {
            return Err(ServiceError::Unavailable("storage is read-only".to_string()));
        };
        self.deletion_batches.lock().unwrap().push(post_ids.to_vec());
        let mut posts = self.posts.lock().unwrap();
        let deleted_count = posts.iter()
            .filter(|post| post_ids.contains(&post.id))
            .count();
        posts.retain(|post| {
            !post_ids.contains(&post.id) &&
                !post.reblog_of_id.is_some_and(|id| post_ids.contains(&id))
        });
        Ok(deleted_count as u64)
    }

    async fn list_local_followers(
        &self,
        account: &DbAccount,
    ) -> Result<Vec<DbAccount>, ServiceError> {
        let followers = self.followers.iter()
            .filter(|(target_id, follower)| {
                *target_id == account.id && follower.is_local()
            })
            .map(|(_, follower)| follower.clone())
            .collect();
        Ok(followers)
    }
}

#[derive(Default)]
pub struct MemoryTimelineCache {
    calls: Mutex<Vec<(Uuid, Uuid)>>,
    failing_recipient_id: Option<Uuid>,
}

impl MemoryTimelineCache {
    pub fn failing_for(recipient_id: Uuid) -> Self {
        Self {
            failing_recipient_id: Some(recipient_id),
            ..Default::default()
        }
    }

    /// Returns successful (recipient, post) removals
    pub fn calls(&self) -> Vec<(Uuid, Uuid)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimelineCache for MemoryTimelineCache {
    async fn unpush(
        &self,
        _timeline: TimelineKind,
        recipient_id: Uuid,
        post: &Post,
    ) -> Result<(), ServiceError> {
        if self.failing_recipient_id == Some(recipient_id) {
            return Err(ServiceError::Unavailable("timeline cache".to_string()));
        };
        self.calls.lock().unwrap().push((recipient_id, post.id));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPublishChannel {
    batches: Mutex<Vec<Vec<(String, String)>>>,
    is_failing: bool,
}

impl MemoryPublishChannel {
    pub fn failing() -> Self {
        Self { is_failing: true, ..Default::default() }
    }

    /// Returns published (channel, payload) pairs grouped by round-trip
    pub fn batches(&self) -> Vec<Vec<(String, String)>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishChannel for MemoryPublishChannel {
    async fn publish_pipelined(
        &self,
        messages: &[(Channel, &str)],
    ) -> Result<(), ServiceError> {
        if self.is_failing {
            return Err(ServiceError::Unavailable("publish channel".to_string()));
        };
        let batch = messages.iter()
            .map(|(channel, payload)| (channel.to_string(), payload.to_string()))
            .collect();
        self.batches.lock().unwrap().push(batch);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryJobSink {
    pushes: Mutex<Vec<(JobType, Vec<JsonValue>)>>,
    is_failing: bool,
}

impl MemoryJobSink {
    pub fn failing() -> Self {
        Self { is_failing: true, ..Default::default() }
    }

    pub fn pushes(&self) -> Vec<(JobType, Vec<JsonValue>)> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSink for MemoryJobSink {
    async fn push_bulk(
        &self,
        job_type: JobType,
        jobs_data: Vec<JsonValue>,
    ) -> Result<(), ServiceError> {
        if self.is_failing {
            return Err(ServiceError::Unavailable("job queue".to_string()));
        };
        self.pushes.lock().unwrap().push((job_type, jobs_data));
        Ok(())
    }
}

/// Records posts for which federation payload was rendered
pub struct CountingEncoder {
    inner: ActivityPubEncoder,
    rendered: Mutex<Vec<Uuid>>,
}

impl CountingEncoder {
    pub fn new(instance_url: &str) -> Self {
        Self {
            inner: ActivityPubEncoder::new(instance_url),
            rendered: Mutex::new(vec![]),
        }
    }

    pub fn rendered(&self) -> Vec<Uuid> {
        self.rendered.lock().unwrap().clone()
    }
}

impl PayloadEncoder for CountingEncoder {
    fn render_federation_payload(&self, post: &Post) -> String {
        self.rendered.lock().unwrap().push(post.id);
        self.inner.render_federation_payload(post)
    }
}
