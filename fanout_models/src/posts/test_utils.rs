use chrono::Utc;
use uuid::Uuid;

use crate::database::DatabaseClient;
use crate::profiles::types::DbAccount;

use super::types::{DbStreamEntry, Post, Visibility};

impl Post {
    pub fn local_for_test(author: &DbAccount) -> Self {
        assert!(author.is_local());
        Post {
            author: author.clone(),
            ..Default::default()
        }
    }

    pub fn remote_for_test(
        author: &DbAccount,
        object_id: &str,
    ) -> Self {
        assert!(!author.is_local());
        Post {
            author: author.clone(),
            object_id: Some(object_id.to_string()),
            ..Default::default()
        }
    }

    pub fn reblog_for_test(author: &DbAccount, original: &Post) -> Self {
        let reblog_id = Uuid::new_v4();
        let object_id = author.actor_id.as_ref()
            .map(|actor_id| format!("{actor_id}/announces/{reblog_id}"));
        Post {
            id: reblog_id,
            author: author.clone(),
            reblog_of_id: Some(original.id),
            object_id: object_id,
            ..Default::default()
        }
    }

    pub fn with_stream_entry(mut self, stream_entry_id: i64) -> Self {
        self.stream_entry = Some(DbStreamEntry {
            id: stream_entry_id,
            post_id: self.id,
            account_id: self.author.id,
            created_at: Utc::now(),
        });
        self
    }
}

/// Saves post (or reblog if original post ID is given)
pub async fn create_test_post(
    db_client: &impl DatabaseClient,
    author: &DbAccount,
    reblog_of_id: Option<Uuid>,
) -> Uuid {
    let post_id = Uuid::new_v4();
    let object_id = author.actor_id.as_ref()
        .map(|actor_id| format!("{actor_id}/objects/{post_id}"));
    let content = if reblog_of_id.is_some() { "" } else { "test" };
    db_client.execute(
        "
        INSERT INTO post (
            id,
            author_id,
            reblog_of_id,
            visibility,
            content,
            object_id
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
        &[
            &post_id,
            &author.id,
            &reblog_of_id,
            &i16::from(Visibility::Public),
            &content,
            &object_id,
        ],
    ).await.unwrap();
    post_id
}

pub async fn create_test_mention(
    db_client: &impl DatabaseClient,
    post_id: Uuid,
    account_id: Uuid,
) -> () {
    db_client.execute(
        "
        INSERT INTO post_mention (post_id, account_id)
        VALUES ($1, $2)
        ",
        &[&post_id, &account_id],
    ).await.unwrap();
}

pub async fn create_test_tag(
    db_client: &impl DatabaseClient,
    post_id: Uuid,
    tag_name: &str,
) -> () {
    db_client.execute(
        "
        WITH tag AS (
            INSERT INTO tag (tag_name) VALUES ($2)
            ON CONFLICT (tag_name) DO UPDATE SET tag_name = $2
            RETURNING id
        )
        INSERT INTO post_tag (post_id, tag_id)
        SELECT $1, tag.id FROM tag
        ",
        &[&post_id, &tag_name],
    ).await.unwrap();
}

/// Returns ID of created stream entry
pub async fn create_test_stream_entry(
    db_client: &impl DatabaseClient,
    post_id: Uuid,
    account_id: Uuid,
) -> i64 {
    let row = db_client.query_one(
        "
        INSERT INTO stream_entry (post_id, account_id)
        VALUES ($1, $2)
        RETURNING id
        ",
        &[&post_id, &account_id],
    ).await.unwrap();
    row.get("id")
}
