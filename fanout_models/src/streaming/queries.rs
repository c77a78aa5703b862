use crate::database::{DatabaseClient, DatabaseError};

// https://www.postgresql.org/docs/current/sql-notify.html
const PAYLOAD_SIZE_MAX: usize = 7999;

/// Sends notifications with a single statement.
/// Notifications are delivered together when the transaction commits.
pub async fn notify_many(
    db_client: &impl DatabaseClient,
    messages: &[(String, String)],
) -> Result<(), DatabaseError> {
    let mut channels = vec![];
    let mut payloads = vec![];
    for (channel, payload) in messages {
        if payload.len() > PAYLOAD_SIZE_MAX {
            log::warn!("notification payload is too large ({channel})");
            continue;
        };
        channels.push(channel.as_str());
        payloads.push(payload.as_str());
    };
    if channels.is_empty() {
        return Ok(());
    };
    db_client.execute(
        "
        SELECT pg_notify(message.channel, message.payload)
        FROM unnest($1::text[], $2::text[]) AS message (channel, payload)
        ",
        &[&channels, &payloads],
    ).await?;
    Ok(())
}
