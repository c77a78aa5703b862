use std::fmt;

use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use uuid::Uuid;

use crate::database::DatabaseTypeError;

#[derive(Clone, Debug, FromSql, PartialEq)]
#[postgres(name = "account")]
pub struct DbAccount {
    pub id: Uuid,
    pub username: String,
    pub hostname: Option<String>,
    pub actor_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbAccount {
    pub(crate) fn check_consistency(&self) -> Result<(), DatabaseTypeError> {
        if self.hostname.is_none() != self.actor_id.is_none() {
            return Err(DatabaseTypeError);
        };
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.hostname.is_none()
    }

    /// Returns domain of a remote account
    pub fn domain(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}

impl fmt::Display for DbAccount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hostname {
            Some(ref hostname) => write!(formatter, "@{}@{}", self.username, hostname),
            None => write!(formatter, "@{}", self.username),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl DbAccount {
    pub fn local_for_test(username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            hostname: None,
            actor_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn remote_for_test(username: &str, hostname: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            hostname: Some(hostname.to_string()),
            actor_id: Some(format!("https://{hostname}/users/{username}")),
            created_at: Utc::now(),
        }
    }
}
