use crate::database::DatabaseClient;

use super::types::DbAccount;

/// Saves local account (or remote account if hostname is given)
pub async fn create_test_account(
    db_client: &impl DatabaseClient,
    username: &str,
    hostname: Option<&str>,
) -> DbAccount {
    let account = match hostname {
        Some(hostname) => DbAccount::remote_for_test(username, hostname),
        None => DbAccount::local_for_test(username),
    };
    db_client.execute(
        "
        INSERT INTO account (id, username, hostname, actor_id)
        VALUES ($1, $2, $3, $4)
        ",
        &[
            &account.id,
            &account.username,
            &account.hostname,
            &account.actor_id,
        ],
    ).await.unwrap();
    account
}
