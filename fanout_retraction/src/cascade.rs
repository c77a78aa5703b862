use indexmap::IndexMap;
use uuid::Uuid;

use fanout_models::posts::types::Post;

use crate::collaborators::{PayloadEncoder, Storage};
use crate::errors::ServiceError;
use crate::index::{build_index, MentionTagIndex};
use crate::types::RemovedPost;

pub struct WorkingSet {
    /// IDs of loaded posts, without reblogs
    pub original_ids: Vec<Uuid>,
    /// Loaded posts followed by their reblogs
    pub posts: Vec<Post>,
}

/// Loads posts and all their reblogs.
/// Each post appears in the working set only once.
pub async fn load_working_set(
    storage: &dyn Storage,
    post_ids: &[Uuid],
) -> Result<WorkingSet, ServiceError> {
    let posts = storage.load_posts(post_ids).await?;
    let original_ids = posts.iter().map(|post| post.id).collect();
    let mut working_set = IndexMap::new();
    for post in posts {
        let reblogs = storage.load_reblogs(&post).await?;
        working_set.entry(post.id).or_insert(post);
        for reblog in reblogs {
            working_set.entry(reblog.id).or_insert(reblog);
        };
    };
    Ok(WorkingSet {
        original_ids,
        posts: working_set.into_values().collect(),
    })
}

/// Captures everything the fan-out needs before posts are destroyed
pub fn take_snapshot(
    encoder: &dyn PayloadEncoder,
    posts: Vec<Post>,
) -> Vec<RemovedPost> {
    let mut index = build_index(&posts);
    posts.into_iter()
        .map(|post| {
            let MentionTagIndex { mentions, tags } =
                index.remove(&post.id).unwrap_or_default();
            let retraction = encoder.encode_deletion_event(post.id);
            RemovedPost { post, mentions, tags, retraction }
        })
        .collect()
}

pub async fn destroy_posts(
    storage: &dyn Storage,
    post_ids: &[Uuid],
    batch_size: usize,
) -> Result<u64, ServiceError> {
    let mut deleted_count = 0;
    for batch in post_ids.chunks(batch_size.max(1)) {
        deleted_count += storage.delete_by_ids(batch).await?;
    };
    Ok(deleted_count)
}

/// Expands the input with reblogs, takes snapshot and deletes posts.
/// Returns snapshot and the number of deleted rows.
pub async fn delete_with_reblogs(
    storage: &dyn Storage,
    encoder: &dyn PayloadEncoder,
    post_ids: &[Uuid],
    batch_size: usize,
) -> Result<(Vec<RemovedPost>, u64), ServiceError> {
    let WorkingSet { original_ids, posts } =
        load_working_set(storage, post_ids).await?;
    let removed_posts = take_snapshot(encoder, posts);
    if original_ids.is_empty() {
        return Ok((removed_posts, 0));
    };
    // Reblogs are deleted by storage
    let deleted_count = destroy_posts(storage, &original_ids, batch_size).await?;
    Ok((removed_posts, deleted_count))
}
