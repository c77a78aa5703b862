use std::collections::HashMap;

use uuid::Uuid;

use fanout_models::{
    posts::types::Post,
    profiles::types::DbAccount,
};

/// Mentions and hashtags used for targeted fan-out
#[derive(Debug, Default, PartialEq)]
pub struct MentionTagIndex {
    pub mentions: Vec<DbAccount>,
    pub tags: Vec<String>,
}

impl MentionTagIndex {
    pub fn lookup(post: &Post) -> Self {
        // Reblogs are retracted from tag timelines and remote servers
        // together with the original post
        if post.is_reblog() {
            return Self::default();
        };
        Self {
            mentions: post.mentions.clone(),
            tags: post.tags.clone(),
        }
    }
}

/// Resolves mentions and tags of every post in the working set
pub fn build_index(posts: &[Post]) -> HashMap<Uuid, MentionTagIndex> {
    posts.iter()
        .map(|post| (post.id, MentionTagIndex::lookup(post)))
        .collect()
}
