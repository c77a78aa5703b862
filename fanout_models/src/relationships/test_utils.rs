use uuid::Uuid;

use crate::database::DatabaseClient;

use super::types::RelationshipType;

pub async fn create_test_follow(
    db_client: &impl DatabaseClient,
    source_id: Uuid,
    target_id: Uuid,
) -> () {
    db_client.execute(
        "
        INSERT INTO relationship (source_id, target_id, relationship_type)
        VALUES ($1, $2, $3)
        ",
        &[&source_id, &target_id, &i16::from(RelationshipType::Follow)],
    ).await.unwrap();
}
