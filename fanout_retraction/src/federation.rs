use std::collections::HashSet;

use fanout_models::profiles::types::DbAccount;

use crate::collaborators::PayloadEncoder;
use crate::types::{FederationBatchEntry, RemovedPost};

/// Selects one mentioned remote account per server.
/// The first mention of each server wins.
pub fn get_domain_representatives(mentions: &[DbAccount]) -> Vec<&DbAccount> {
    let mut domains = HashSet::new();
    mentions.iter()
        .filter_map(|account| account.domain().map(|domain| (domain, account)))
        .filter(|(domain, _)| domains.insert(*domain))
        .map(|(_, account)| account)
        .collect()
}

/// Prepares one delivery per server of a mentioned remote account.
/// Payload is rendered only if there are remote recipients.
pub fn batch_retraction_deliveries(
    encoder: &dyn PayloadEncoder,
    removed: &RemovedPost,
) -> Vec<FederationBatchEntry> {
    let recipients = get_domain_representatives(&removed.mentions);
    if recipients.is_empty() {
        return vec![];
    };
    let payload = encoder.render_federation_payload(&removed.post);
    recipients.into_iter()
        .map(|recipient| FederationBatchEntry {
            payload: payload.clone(),
            sender_id: removed.post.author.id,
            recipient_id: recipient.id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use fanout_models::posts::types::Post;
    use crate::cascade::take_snapshot;
    use crate::test_utils::CountingEncoder;
    use super::*;

    const INSTANCE_URL: &str = "https://social.example";

    #[test]
    fn test_get_domain_representatives() {
        let local = DbAccount::local_for_test("local");
        let remote_1 = DbAccount::remote_for_test("user1", "one.example");
        let remote_2 = DbAccount::remote_for_test("user2", "one.example");
        let remote_3 = DbAccount::remote_for_test("user3", "two.example");
        let mentions = vec![
            local,
            remote_1.clone(),
            remote_2,
            remote_3.clone(),
        ];
        let representatives = get_domain_representatives(&mentions);
        assert_eq!(representatives, vec![&remote_1, &remote_3]);
    }

    #[test]
    fn test_batch_retraction_deliveries() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            mentions: vec![
                DbAccount::remote_for_test("user1", "one.example"),
                DbAccount::remote_for_test("user2", "one.example"),
                DbAccount::remote_for_test("user3", "one.example"),
                DbAccount::remote_for_test("user4", "two.example"),
                DbAccount::local_for_test("local"),
            ],
            ..Post::local_for_test(&author)
        };
        let encoder = CountingEncoder::new(INSTANCE_URL);
        let removed = take_snapshot(&encoder, vec![post]).remove(0);

        let entries = batch_retraction_deliveries(&encoder, &removed);
        // One entry per server
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sender_id, author.id);
        assert_eq!(entries[0].recipient_id, removed.mentions[0].id);
        assert_eq!(entries[1].recipient_id, removed.mentions[3].id);
        assert_eq!(entries[0].payload, entries[1].payload);
        // Rendered once
        assert_eq!(encoder.rendered(), vec![removed.post.id]);
    }

    #[test]
    fn test_batch_retraction_deliveries_no_remote_mentions() {
        let author = DbAccount::local_for_test("author");
        let post = Post {
            mentions: vec![DbAccount::local_for_test("local")],
            ..Post::local_for_test(&author)
        };
        let encoder = CountingEncoder::new(INSTANCE_URL);
        let removed = take_snapshot(&encoder, vec![post]).remove(0);

        let entries = batch_retraction_deliveries(&encoder, &removed);
        assert_eq!(entries.is_empty(), true);
        assert_eq!(encoder.rendered().is_empty(), true);
    }

    #[test]
    fn test_batch_retraction_deliveries_remote_author() {
        let author = DbAccount::remote_for_test("author", "remote.example");
        let post = Post {
            mentions: vec![DbAccount::remote_for_test("user", "other.example")],
            ..Post::remote_for_test(&author, "https://remote.example/objects/1")
        };
        let encoder = CountingEncoder::new(INSTANCE_URL);
        let removed = take_snapshot(&encoder, vec![post]).remove(0);

        let entries = batch_retraction_deliveries(&encoder, &removed);
        assert_eq!(entries.len(), 1);
        // Sender is the author even if the author is remote
        assert_eq!(entries[0].sender_id, author.id);
        assert_eq!(entries[0].recipient_id, removed.mentions[0].id);
    }
}
