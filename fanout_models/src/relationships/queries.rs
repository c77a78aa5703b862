use uuid::Uuid;

use crate::database::{DatabaseClient, DatabaseError};
use crate::profiles::types::DbAccount;

use super::types::RelationshipType;

/// Returns local accounts that follow the given account
pub async fn get_local_followers(
    db_client: &impl DatabaseClient,
    account_id: Uuid,
) -> Result<Vec<DbAccount>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT account
        FROM account
        JOIN relationship
        ON (account.id = relationship.source_id)
        WHERE
            relationship.target_id = $1
            AND relationship.relationship_type = $2
            AND account.hostname IS NULL
        ORDER BY relationship.id
        ",
        &[&account_id, &i16::from(RelationshipType::Follow)],
    ).await?;
    let followers = rows.iter()
        .map(|row| row.try_get("account"))
        .collect::<Result<_, _>>()?;
    Ok(followers)
}
