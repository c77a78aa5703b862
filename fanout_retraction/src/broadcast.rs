use crate::collaborators::{Channel, PublishChannel};
use crate::types::{RemovedPost, RetractionReport};

/// Returns channels where the post could have been streamed
pub fn get_retraction_channels(removed: &RemovedPost) -> Vec<Channel> {
    let is_local = removed.post.is_local();
    let mut channels = vec![Channel::Public];
    if is_local {
        channels.push(Channel::PublicLocal);
    };
    for tag in removed.tags.iter() {
        channels.push(Channel::Hashtag(tag.clone()));
        if is_local {
            channels.push(Channel::HashtagLocal(tag.clone()));
        };
    };
    channels
}

/// Publishes deletion event to public and hashtag channels.
/// All messages are sent in one round-trip.
pub async fn unpush_from_public_timelines(
    channel: &dyn PublishChannel,
    removed: &RemovedPost,
    report: &mut RetractionReport,
) -> () {
    // Non-public posts are not streamed to public channels
    if !removed.post.is_public() {
        return;
    };
    let payload = removed.retraction.as_str();
    let messages: Vec<_> = get_retraction_channels(removed)
        .into_iter()
        .map(|name| (name, payload))
        .collect();
    report.publish_calls += 1;
    if let Err(error) = channel.publish_pipelined(&messages).await {
        report.publish_failures += 1;
        log::warn!(
            "failed to publish deletion of post {}: {}",
            removed.post.id,
            error,
        );
    };
}
