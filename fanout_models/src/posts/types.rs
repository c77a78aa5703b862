use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::database::{
    int_enum::int_enum_from_sql,
    DatabaseError,
    DatabaseTypeError,
};
use crate::profiles::types::DbAccount;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visibility {
    Public,
    Unlisted,
    Followers,
    Direct,
}

impl Default for Visibility {
    fn default() -> Self { Self::Public }
}

impl From<Visibility> for i16 {
    fn from(value: Visibility) -> i16 {
        match value {
            Visibility::Public => 1,
            Visibility::Unlisted => 2,
            Visibility::Followers => 3,
            Visibility::Direct => 4,
        }
    }
}

impl TryFrom<i16> for Visibility {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let visibility = match value {
            1 => Self::Public,
            2 => Self::Unlisted,
            3 => Self::Followers,
            4 => Self::Direct,
            _ => return Err(DatabaseTypeError),
        };
        Ok(visibility)
    }
}

int_enum_from_sql!(Visibility);

#[derive(FromSql)]
#[postgres(name = "post")]
pub struct DbPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub reblog_of_id: Option<Uuid>,
    pub visibility: Visibility,
    pub content: String,
    pub object_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Federation wrapper of a post, used by feed subscribers
#[derive(Clone, Debug, FromSql, PartialEq)]
#[postgres(name = "stream_entry")]
pub struct DbStreamEntry {
    pub id: i64,
    pub post_id: Uuid,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Post {
    pub id: Uuid,
    pub author: DbAccount,
    pub reblog_of_id: Option<Uuid>,
    pub visibility: Visibility,
    pub content: String,
    pub object_id: Option<String>,
    pub stream_entry: Option<DbStreamEntry>,
    pub mentions: Vec<DbAccount>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        db_post: DbPost,
        db_author: DbAccount,
        db_stream_entry: Option<DbStreamEntry>,
        db_mentions: Vec<DbAccount>,
        db_tags: Vec<String>,
    ) -> Result<Self, DatabaseTypeError> {
        // Consistency checks
        db_author.check_consistency()?;
        if db_post.author_id != db_author.id {
            return Err(DatabaseTypeError);
        };
        if db_author.is_local() != db_post.object_id.is_none() {
            return Err(DatabaseTypeError);
        };
        if let Some(ref db_stream_entry) = db_stream_entry {
            if db_stream_entry.post_id != db_post.id ||
                db_stream_entry.account_id != db_author.id
            {
                return Err(DatabaseTypeError);
            };
        };
        // Reblogs don't have their own mentions and tags
        if db_post.reblog_of_id.is_some() && (
            db_post.content.len() != 0 ||
            !db_mentions.is_empty() ||
            !db_tags.is_empty()
        ) {
            return Err(DatabaseTypeError);
        };
        let post = Self {
            id: db_post.id,
            author: db_author,
            reblog_of_id: db_post.reblog_of_id,
            visibility: db_post.visibility,
            content: db_post.content,
            object_id: db_post.object_id,
            stream_entry: db_stream_entry,
            mentions: db_mentions,
            tags: db_tags,
            created_at: db_post.created_at,
        };
        Ok(post)
    }

    pub fn is_local(&self) -> bool {
        self.author.is_local()
    }

    pub fn is_reblog(&self) -> bool {
        self.reblog_of_id.is_some()
    }

    pub fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for Post {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            author: DbAccount::local_for_test("test"),
            reblog_of_id: None,
            visibility: Visibility::Public,
            content: "".to_string(),
            object_id: None,
            stream_entry: None,
            mentions: vec![],
            tags: vec![],
            created_at: Utc::now(),
        }
    }
}

impl TryFrom<&Row> for Post {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let db_post: DbPost = row.try_get("post")?;
        let db_author: DbAccount = row.try_get("account")?;
        let db_stream_entry: Option<DbStreamEntry> = row.try_get("stream_entry")?;
        // Data from subqueries
        let db_mentions: Vec<DbAccount> = row.try_get("mentions")?;
        let db_tags: Vec<String> = row.try_get("tags")?;
        let post = Self::new(
            db_post,
            db_author,
            db_stream_entry,
            db_mentions,
            db_tags,
        )?;
        Ok(post)
    }
}
