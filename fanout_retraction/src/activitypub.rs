//! Federation payloads for removed posts.
use serde::Serialize;
use uuid::Uuid;

use fanout_models::{
    posts::types::Post,
    profiles::types::DbAccount,
};

use crate::collaborators::PayloadEncoder;

const AP_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";
const AP_PUBLIC: &str = "https://www.w3.org/ns/activitystreams#Public";

const ANNOUNCE: &str = "Announce";
const DELETE: &str = "Delete";
const NOTE: &str = "Note";
const TOMBSTONE: &str = "Tombstone";
const UNDO: &str = "Undo";

fn local_actor_id(instance_url: &str, username: &str) -> String {
    format!("{}/users/{}", instance_url, username)
}

fn local_object_id(instance_url: &str, internal_object_id: Uuid) -> String {
    format!("{}/objects/{}", instance_url, internal_object_id)
}

fn local_activity_id(
    instance_url: &str,
    activity_type: &str,
    internal_object_id: Uuid,
) -> String {
    format!(
        "{}/activities/{}/{}",
        instance_url,
        activity_type.to_lowercase(),
        internal_object_id,
    )
}

fn account_actor_id(instance_url: &str, account: &DbAccount) -> String {
    match account.actor_id {
        Some(ref actor_id) => actor_id.clone(),
        None => local_actor_id(instance_url, &account.username),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tombstone {
    id: String,

    #[serde(rename = "type")]
    object_type: String,

    former_type: String,
}

#[derive(Serialize)]
struct DeleteNote {
    #[serde(rename = "@context")]
    context: String,

    #[serde(rename = "type")]
    activity_type: String,

    id: String,
    actor: String,
    object: Tombstone,

    to: Vec<String>,
    cc: Vec<String>,
}

#[derive(Serialize)]
struct UndoAnnounce {
    #[serde(rename = "@context")]
    context: String,

    #[serde(rename = "type")]
    activity_type: String,

    id: String,
    actor: String,
    object: String,

    to: Vec<String>,
    cc: Vec<String>,
}

/// Renders Delete(Tombstone) for posts and Undo(Announce) for reblogs
pub struct ActivityPubEncoder {
    instance_url: String,
}

impl ActivityPubEncoder {
    pub fn new(instance_url: &str) -> Self {
        Self { instance_url: instance_url.trim_end_matches('/').to_string() }
    }

    fn get_audience(&self, post: &Post, actor_id: &str) -> (Vec<String>, Vec<String>) {
        let followers = format!("{}/followers", actor_id);
        let (mut primary_audience, mut secondary_audience) =
            if post.is_public() {
                (vec![AP_PUBLIC.to_string()], vec![followers])
            } else {
                (vec![followers], vec![])
            };
        for mention in post.mentions.iter() {
            let mention_id = account_actor_id(&self.instance_url, mention);
            if !primary_audience.contains(&mention_id) &&
                !secondary_audience.contains(&mention_id)
            {
                secondary_audience.push(mention_id);
            };
        };
        primary_audience.sort_unstable();
        secondary_audience.sort_unstable();
        (primary_audience, secondary_audience)
    }

    fn build_delete_note(&self, post: &Post) -> DeleteNote {
        let actor_id = account_actor_id(&self.instance_url, &post.author);
        let object_id = post.object_id.clone()
            .unwrap_or_else(|| local_object_id(&self.instance_url, post.id));
        let activity_id = local_activity_id(
            &self.instance_url,
            DELETE,
            post.id,
        );
        let (to, cc) = self.get_audience(post, &actor_id);
        DeleteNote {
            context: AP_CONTEXT.to_string(),
            activity_type: DELETE.to_string(),
            id: activity_id,
            actor: actor_id,
            object: Tombstone {
                id: object_id,
                object_type: TOMBSTONE.to_string(),
                former_type: NOTE.to_string(),
            },
            to: to,
            cc: cc,
        }
    }

    fn build_undo_announce(&self, repost: &Post) -> UndoAnnounce {
        assert!(repost.is_reblog());
        let actor_id = account_actor_id(&self.instance_url, &repost.author);
        let announce_id = repost.object_id.clone()
            .unwrap_or_else(|| local_activity_id(
                &self.instance_url,
                ANNOUNCE,
                repost.id,
            ));
        let activity_id = local_activity_id(
            &self.instance_url,
            UNDO,
            repost.id,
        );
        let (to, cc) = self.get_audience(repost, &actor_id);
        UndoAnnounce {
            context: AP_CONTEXT.to_string(),
            activity_type: UNDO.to_string(),
            id: activity_id,
            actor: actor_id,
            object: announce_id,
            to: to,
            cc: cc,
        }
    }
}

impl PayloadEncoder for ActivityPubEncoder {
    fn render_federation_payload(&self, post: &Post) -> String {
        let activity_json = if post.is_reblog() {
            serde_json::to_string(&self.build_undo_announce(post))
        } else {
            serde_json::to_string(&self.build_delete_note(post))
        };
        activity_json.expect("activity should be serializable")
    }
}
