use indexmap::IndexMap;
use uuid::Uuid;

use fanout_config::{FederationConfig, RetractionConfig};

use crate::broadcast::unpush_from_public_timelines;
use crate::cascade::delete_with_reblogs;
use crate::collaborators::{
    JobSink,
    PayloadEncoder,
    PublishChannel,
    Storage,
    TimelineCache,
};
use crate::dispatch::BatchDispatcher;
use crate::errors::RetractionError;
use crate::federation::batch_retraction_deliveries;
use crate::home_timeline::{batch_stream_entries, unpush_from_home_timelines};
use crate::types::{RemovedPost, RetractionReport};

pub struct Collaborators<'a> {
    pub storage: &'a dyn Storage,
    pub timelines: &'a dyn TimelineCache,
    pub channel: &'a dyn PublishChannel,
    pub job_sink: &'a dyn JobSink,
    pub encoder: &'a dyn PayloadEncoder,
}

fn group_by_author(
    removed_posts: &[RemovedPost],
) -> IndexMap<Uuid, Vec<&RemovedPost>> {
    let mut groups: IndexMap<_, Vec<_>> = IndexMap::new();
    for removed in removed_posts {
        groups.entry(removed.post.author.id).or_default().push(removed);
    };
    groups
}

/// Deletes posts with all their reblogs and retracts them
/// from timelines, live channels and remote servers.
pub async fn remove_posts(
    config: &RetractionConfig,
    federation_config: &FederationConfig,
    collaborators: &Collaborators<'_>,
    post_ids: &[Uuid],
) -> Result<RetractionReport, RetractionError> {
    let mut report = RetractionReport::default();
    let (removed_posts, deleted_count) = delete_with_reblogs(
        collaborators.storage,
        collaborators.encoder,
        post_ids,
        config.deletion_batch_size,
    ).await.map_err(RetractionError::StorageFailure)?;
    report.working_set_size = removed_posts.len();
    report.deleted_count = deleted_count;
    if removed_posts.is_empty() {
        return Ok(report);
    };

    let mut dispatcher = BatchDispatcher::default();
    for (_, posts) in group_by_author(&removed_posts) {
        let author = &posts[0].post.author;
        unpush_from_home_timelines(
            collaborators.storage,
            collaborators.timelines,
            author,
            &posts,
            &mut report,
        ).await.map_err(RetractionError::StorageFailure)?;
        if author.is_local() {
            let batches = batch_stream_entries(
                &posts,
                config.stream_entry_batch_size,
            );
            dispatcher.add_stream_entry_batches(batches);
        };
    };

    for removed in removed_posts.iter() {
        unpush_from_public_timelines(
            collaborators.channel,
            removed,
            &mut report,
        ).await;
        if federation_config.enabled {
            let entries = batch_retraction_deliveries(
                collaborators.encoder,
                removed,
            );
            dispatcher.add_federation_entries(entries);
        };
    };

    dispatcher.flush(collaborators.job_sink, &mut report).await
        .map_err(RetractionError::JobSinkFailure)?;
    log::info!(
        "removed {} posts ({} with reblogs)",
        report.deleted_count,
        report.working_set_size,
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use fanout_models::{
        background_jobs::types::JobType,
        posts::types::Post,
        profiles::types::DbAccount,
    };
    use crate::errors::ServiceError;
    use crate::test_utils::{
        CountingEncoder,
        MemoryJobSink,
        MemoryPublishChannel,
        MemoryStorage,
        MemoryTimelineCache,
    };
    use crate::types::{FederationBatchEntry, StreamEntryBatch};
    use super::*;

    const INSTANCE_URL: &str = "https://social.example";

    struct TestEnv {
        storage: MemoryStorage,
        timelines: MemoryTimelineCache,
        channel: MemoryPublishChannel,
        job_sink: MemoryJobSink,
        encoder: CountingEncoder,
    }

    impl TestEnv {
        fn new(storage: MemoryStorage) -> Self {
            Self {
                storage,
                timelines: MemoryTimelineCache::default(),
                channel: MemoryPublishChannel::default(),
                job_sink: MemoryJobSink::default(),
                encoder: CountingEncoder::new(INSTANCE_URL),
            }
        }

        async fn remove_posts(
            &self,
            post_ids: &[Uuid],
        ) -> Result<RetractionReport, RetractionError> {
            self.remove_posts_with_config(
                &FederationConfig::default(),
                post_ids,
            ).await
        }

        async fn remove_posts_with_config(
            &self,
            federation_config: &FederationConfig,
            post_ids: &[Uuid],
        ) -> Result<RetractionReport, RetractionError> {
            let collaborators = Collaborators {
                storage: &self.storage,
                timelines: &self.timelines,
                channel: &self.channel,
                job_sink: &self.job_sink,
                encoder: &self.encoder,
            };
            remove_posts(
                &RetractionConfig::default(),
                federation_config,
                &collaborators,
                post_ids,
            ).await
        }

        fn federation_entries(&self) -> Vec<FederationBatchEntry> {
            self.job_sink.pushes().into_iter()
                .filter(|(job_type, _)| *job_type == JobType::DeliverRetraction)
                .flat_map(|(_, jobs_data)| jobs_data)
                .map(|job_data| serde_json::from_value(job_data).unwrap())
                .collect()
        }

        fn stream_entry_batches(&self) -> Vec<StreamEntryBatch> {
            self.job_sink.pushes().into_iter()
                .filter(|(job_type, _)| *job_type == JobType::DistributeStreamEntries)
                .flat_map(|(_, jobs_data)| jobs_data)
                .map(|job_data| serde_json::from_value(job_data).unwrap())
                .collect()
        }
    }

    #[tokio::test]
    async fn test_remove_posts_with_reblogs() {
        let author = DbAccount::local_for_test("author");
        let booster = DbAccount::remote_for_test("booster", "remote.example");
        let post = Post::local_for_test(&author);
        let reblog = Post::reblog_for_test(&booster, &post);
        let other_post = Post::local_for_test(&author);
        let env = TestEnv::new(MemoryStorage::new(vec![
            post.clone(),
            reblog.clone(),
            other_post.clone(),
        ]));

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.working_set_size, 2);
        assert_eq!(report.deleted_count, 1);
        // Unrelated posts are not touched
        assert_eq!(env.storage.post_count(), 1);
        // Author's timeline + public channels of both posts
        assert_eq!(env.timelines.calls(), vec![(author.id, post.id)]);
        assert_eq!(report.publish_calls, 2);
        let published: Vec<_> = env.channel.batches().into_iter()
            .map(|batch| batch[0].1.clone())
            .collect();
        assert_eq!(published, vec![
            format!(r#"{{"event":"delete","payload":"{}"}}"#, post.id),
            format!(r#"{{"event":"delete","payload":"{}"}}"#, reblog.id),
        ]);
    }

    #[tokio::test]
    async fn test_remove_posts_federation_per_domain() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            mentions: vec![
                DbAccount::remote_for_test("user1", "one.example"),
                DbAccount::remote_for_test("user2", "one.example"),
                DbAccount::remote_for_test("user3", "one.example"),
                DbAccount::remote_for_test("user4", "two.example"),
            ],
            ..Post::local_for_test(&author)
        };
        let env = TestEnv::new(MemoryStorage::new(vec![post.clone()]));

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.federation_entries, 2);
        let entries = env.federation_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].recipient_id, post.mentions[0].id);
        assert_eq!(entries[1].recipient_id, post.mentions[3].id);
        assert!(entries.iter().all(|entry| entry.sender_id == author.id));
        assert_eq!(env.encoder.rendered(), vec![post.id]);
        let payload: serde_json::Value =
            serde_json::from_str(&entries[0].payload).unwrap();
        assert_eq!(payload["type"], "Delete");
    }

    #[tokio::test]
    async fn test_remove_posts_federation_single_push() {
        let author = DbAccount::local_for_test("author");
        let post_1 = Post {
            mentions: vec![
                DbAccount::remote_for_test("user1", "one.example"),
                DbAccount::remote_for_test("user2", "two.example"),
            ],
            ..Post::local_for_test(&author)
        };
        let post_2 = Post {
            mentions: vec![
                DbAccount::remote_for_test("user3", "two.example"),
                DbAccount::remote_for_test("user4", "one.example"),
            ],
            ..Post::local_for_test(&author)
        };
        let env = TestEnv::new(MemoryStorage::new(vec![
            post_1.clone(),
            post_2.clone(),
        ]));

        let report = env.remove_posts(&[post_1.id, post_2.id]).await.unwrap();
        assert_eq!(report.federation_entries, 4);
        let delivery_pushes: Vec<_> = env.job_sink.pushes().into_iter()
            .filter(|(job_type, _)| *job_type == JobType::DeliverRetraction)
            .collect();
        assert_eq!(delivery_pushes.len(), 1);
        assert_eq!(delivery_pushes[0].1.len(), 4);
        let recipients: Vec<_> = env.federation_entries().iter()
            .map(|entry| entry.recipient_id)
            .collect();
        assert_eq!(recipients, vec![
            post_1.mentions[0].id,
            post_1.mentions[1].id,
            post_2.mentions[0].id,
            post_2.mentions[1].id,
        ]);
        assert_eq!(env.encoder.rendered(), vec![post_1.id, post_2.id]);
    }

    #[tokio::test]
    async fn test_remove_posts_without_remote_mentions() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            mentions: vec![DbAccount::local_for_test("local")],
            ..Post::local_for_test(&author)
        };
        let env = TestEnv::new(MemoryStorage::new(vec![post.clone()]));

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.federation_entries, 0);
        assert_eq!(env.encoder.rendered().is_empty(), true);
        assert_eq!(env.job_sink.pushes().is_empty(), true);
    }

    #[tokio::test]
    async fn test_remove_posts_federation_disabled() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            mentions: vec![DbAccount::remote_for_test("user", "one.example")],
            ..Post::local_for_test(&author)
        };
        let env = TestEnv::new(MemoryStorage::new(vec![post.clone()]));
        let federation_config = FederationConfig { enabled: false };

        let report = env.remove_posts_with_config(
            &federation_config,
            &[post.id],
        ).await.unwrap();
        assert_eq!(report.federation_entries, 0);
        assert_eq!(env.encoder.rendered().is_empty(), true);
    }

    #[tokio::test]
    async fn test_remove_posts_home_timelines() {
        let author = DbAccount::local_for_test("author");
        let follower_1 = DbAccount::local_for_test("follower1");
        let follower_2 = DbAccount::local_for_test("follower2");
        let follower_3 = DbAccount::local_for_test("follower3");
        let remote_follower =
            DbAccount::remote_for_test("follower", "remote.example");
        let post = Post::local_for_test(&author);
        let mut storage = MemoryStorage::new(vec![post.clone()]);
        for follower in [&follower_1, &follower_2, &follower_3, &remote_follower] {
            storage.add_follower(&author, follower);
        };
        let env = TestEnv::new(storage);

        let report = env.remove_posts(&[post.id]).await.unwrap();
        // 3 local followers + author
        assert_eq!(report.unpush_calls, 4);
        let recipients: Vec<_> = env.timelines.calls().into_iter()
            .map(|(recipient_id, _)| recipient_id)
            .collect();
        assert_eq!(recipients, vec![
            follower_1.id,
            follower_2.id,
            follower_3.id,
            author.id,
        ]);
    }

    #[tokio::test]
    async fn test_remove_posts_remote_author() {
        let author = DbAccount::remote_for_test("author", "remote.example");
        let follower_1 = DbAccount::local_for_test("follower1");
        let follower_2 = DbAccount::local_for_test("follower2");
        let post = Post::remote_for_test(&author, "https://remote.example/objects/1")
            .with_stream_entry(1);
        let mut storage = MemoryStorage::new(vec![post.clone()]);
        storage.add_follower(&author, &follower_1);
        storage.add_follower(&author, &follower_2);
        let env = TestEnv::new(storage);

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.unpush_calls, 2);
        // Stream entries of remote authors are not distributed
        assert_eq!(report.stream_entry_batches, 0);
        assert_eq!(env.stream_entry_batches().is_empty(), true);
        let channel_names: Vec<_> = env.channel.batches()[0].iter()
            .map(|(name, _)| name.clone())
            .collect();
        assert_eq!(channel_names, vec!["timeline:public"]);
    }

    #[tokio::test]
    async fn test_remove_posts_stream_entry_batches() {
        let author = DbAccount::local_for_test("author");
        let posts: Vec<_> = (1..=250)
            .map(|id| Post::local_for_test(&author).with_stream_entry(id))
            .collect();
        let post_ids: Vec<_> = posts.iter().map(|post| post.id).collect();
        let env = TestEnv::new(MemoryStorage::new(posts));

        let report = env.remove_posts(&post_ids).await.unwrap();
        assert_eq!(report.deleted_count, 250);
        assert_eq!(report.stream_entry_batches, 3);
        let batch_sizes: Vec<_> = env.stream_entry_batches().iter()
            .map(|batch| batch.stream_entry_ids.len())
            .collect();
        assert_eq!(batch_sizes, vec![100, 100, 50]);
        // All batches are submitted with a single call
        assert_eq!(env.job_sink.pushes().len(), 1);
        // One pipelined call per post
        assert_eq!(report.publish_calls, 250);
        assert_eq!(env.channel.batches().len(), 250);
    }

    #[tokio::test]
    async fn test_remove_posts_tag_channels() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            tags: vec!["a".to_string(), "b".to_string()],
            ..Post::local_for_test(&author)
        };
        let env = TestEnv::new(MemoryStorage::new(vec![post.clone()]));

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.publish_calls, 1);
        let batches = env.channel.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 6);
    }

    #[tokio::test]
    async fn test_remove_already_deleted_posts() {
        let env = TestEnv::new(MemoryStorage::new(vec![]));

        let report = env.remove_posts(&[Uuid::new_v4()]).await.unwrap();
        assert_eq!(report, RetractionReport::default());
        assert_eq!(env.storage.deletion_batches().is_empty(), true);
        assert_eq!(env.timelines.calls().is_empty(), true);
        assert_eq!(env.channel.batches().is_empty(), true);
        assert_eq!(env.job_sink.pushes().is_empty(), true);
    }

    #[tokio::test]
    async fn test_remove_post_and_its_reblog() {
        let author = DbAccount::local_for_test("author");
        let booster = DbAccount::local_for_test("booster");
        let post = Post::local_for_test(&author);
        let reblog = Post::reblog_for_test(&booster, &post);
        let env = TestEnv::new(MemoryStorage::new(vec![
            post.clone(),
            reblog.clone(),
        ]));

        let report = env.remove_posts(&[post.id, reblog.id]).await.unwrap();
        assert_eq!(report.working_set_size, 2);
        assert_eq!(report.publish_calls, 2);
        // Author and booster timelines
        assert_eq!(env.timelines.calls(), vec![
            (author.id, post.id),
            (booster.id, reblog.id),
        ]);
        assert_eq!(env.storage.post_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_posts_cache_and_channel_failures() {
        let author = DbAccount::local_for_test("author");
        let follower = DbAccount::local_for_test("follower");
        let post = Post::local_for_test(&author).with_stream_entry(1);
        let mut storage = MemoryStorage::new(vec![post.clone()]);
        storage.add_follower(&author, &follower);
        let env = TestEnv {
            timelines: MemoryTimelineCache::failing_for(follower.id),
            channel: MemoryPublishChannel::failing(),
            ..TestEnv::new(storage)
        };

        let report = env.remove_posts(&[post.id]).await.unwrap();
        assert_eq!(report.unpush_calls, 2);
        assert_eq!(report.unpush_failures, 1);
        assert_eq!(report.publish_failures, 1);
        // Remaining steps are completed
        assert_eq!(env.timelines.calls(), vec![(author.id, post.id)]);
        assert_eq!(report.stream_entry_batches, 1);
    }

    #[tokio::test]
    async fn test_remove_posts_job_sink_failure() {
        let author = DbAccount::local_for_test("author");
        let post = Post::local_for_test(&author).with_stream_entry(1);
        let env = TestEnv {
            job_sink: MemoryJobSink::failing(),
            ..TestEnv::new(MemoryStorage::new(vec![post.clone()]))
        };

        let error = env.remove_posts(&[post.id]).await.err().unwrap();
        assert!(matches!(
            error,
            RetractionError::JobSinkFailure(ServiceError::Unavailable(_)),
        ));
    }

    #[tokio::test]
    async fn test_remove_posts_storage_failure() {
        let author = DbAccount::local_for_test("author");
        let follower = DbAccount::local_for_test("follower");
        let post = Post::local_for_test(&author);
        let mut storage = MemoryStorage::new(vec![post.clone()])
            .with_failing_deletion();
        storage.add_follower(&author, &follower);
        let env = TestEnv::new(storage);

        let error = env.remove_posts(&[post.id]).await.err().unwrap();
        assert!(matches!(error, RetractionError::StorageFailure(_)));
        // Nothing is retracted
        assert_eq!(env.storage.post_count(), 1);
        assert_eq!(env.timelines.calls().is_empty(), true);
        assert_eq!(env.channel.batches().is_empty(), true);
        assert_eq!(env.job_sink.pushes().is_empty(), true);
    }
}
