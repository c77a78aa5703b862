use uuid::Uuid;

use crate::database::{DatabaseClient, DatabaseError};

/// Removes post from the materialized home timeline.
/// Returns false if timeline didn't contain the post.
pub async fn delete_home_timeline_entry(
    db_client: &impl DatabaseClient,
    owner_id: Uuid,
    post_id: Uuid,
) -> Result<bool, DatabaseError> {
    let deleted_count = db_client.execute(
        "
        DELETE FROM home_timeline_entry
        WHERE owner_id = $1 AND post_id = $2
        ",
        &[&owner_id, &post_id],
    ).await?;
    Ok(deleted_count > 0)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use crate::database::test_utils::create_test_database;
    use crate::profiles::test_utils::create_test_account;
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_delete_home_timeline_entry() {
        let db_client = &mut create_test_database().await;
        let owner = create_test_account(db_client, "owner", None).await;
        let post_id = Uuid::new_v4();
        db_client.execute(
            "INSERT INTO home_timeline_entry (owner_id, post_id) VALUES ($1, $2)",
            &[&owner.id, &post_id],
        ).await.unwrap();

        let is_deleted = delete_home_timeline_entry(db_client, owner.id, post_id)
            .await.unwrap();
        assert_eq!(is_deleted, true);
        let is_deleted = delete_home_timeline_entry(db_client, owner.id, post_id)
            .await.unwrap();
        assert_eq!(is_deleted, false);
    }
}
