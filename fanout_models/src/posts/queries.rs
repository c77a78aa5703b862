use uuid::Uuid;

use crate::database::{DatabaseClient, DatabaseError};

use super::types::Post;

const RELATED_MENTIONS: &str = "
    ARRAY(
        SELECT account
        FROM post_mention
        JOIN account ON post_mention.account_id = account.id
        WHERE post_mention.post_id = post.id
        ORDER BY post_mention.id
    ) AS mentions";

const RELATED_TAGS: &str = "
    ARRAY(
        SELECT tag.tag_name FROM tag
        JOIN post_tag ON post_tag.tag_id = tag.id
        WHERE post_tag.post_id = post.id
        ORDER BY tag.tag_name
    ) AS tags";

fn post_subqueries() -> String {
    [
        RELATED_MENTIONS,
        RELATED_TAGS,
    ].join(",")
}

/// Returns posts in the order of given IDs.
/// Missing posts are skipped.
pub async fn get_posts_by_ids(
    db_client: &impl DatabaseClient,
    post_ids: &[Uuid],
) -> Result<Vec<Post>, DatabaseError> {
    let statement = format!(
        "
        SELECT
            post, account, stream_entry,
            {post_subqueries}
        FROM post
        JOIN account ON post.author_id = account.id
        LEFT JOIN stream_entry ON stream_entry.post_id = post.id
        WHERE post.id = ANY($1)
        ORDER BY array_position($1, post.id)
        ",
        post_subqueries=post_subqueries(),
    );
    let rows = db_client.query(&statement, &[&post_ids]).await?;
    let posts = rows.iter()
        .map(Post::try_from)
        .collect::<Result<_, _>>()?;
    Ok(posts)
}

pub async fn get_reblogs(
    db_client: &impl DatabaseClient,
    post_id: Uuid,
) -> Result<Vec<Post>, DatabaseError> {
    let statement = format!(
        "
        SELECT
            post, account, stream_entry,
            {post_subqueries}
        FROM post
        JOIN account ON post.author_id = account.id
        LEFT JOIN stream_entry ON stream_entry.post_id = post.id
        WHERE post.reblog_of_id = $1
        ORDER BY post.created_at, post.id
        ",
        post_subqueries=post_subqueries(),
    );
    let rows = db_client.query(&statement, &[&post_id]).await?;
    let posts = rows.iter()
        .map(Post::try_from)
        .collect::<Result<_, _>>()?;
    Ok(posts)
}

/// Deletes posts. Reblogs, stream entries, mentions and tag links
/// are removed by cascading foreign keys.
/// Returns the number of deleted rows (not including cascaded rows).
pub async fn delete_posts(
    db_client: &impl DatabaseClient,
    post_ids: &[Uuid],
) -> Result<u64, DatabaseError> {
    let deleted_count = db_client.execute(
        "
        DELETE FROM post
        WHERE id = ANY($1)
        ",
        &[&post_ids],
    ).await?;
    Ok(deleted_count)
}
