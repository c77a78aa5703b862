use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use serde_json::{Value as JsonValue};
use uuid::Uuid;

use crate::database::{
    int_enum::int_enum_from_sql,
    DatabaseTypeError,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JobType {
    RemovePosts,
    DistributeStreamEntries,
    DeliverRetraction,
}

impl From<JobType> for i16 {
    fn from(value: JobType) -> i16 {
        match value {
            JobType::RemovePosts => 1,
            JobType::DistributeStreamEntries => 2,
            JobType::DeliverRetraction => 3,
        }
    }
}

impl TryFrom<i16> for JobType {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let job_type = match value {
            1 => Self::RemovePosts,
            2 => Self::DistributeStreamEntries,
            3 => Self::DeliverRetraction,
            _ => return Err(DatabaseTypeError),
        };
        Ok(job_type)
    }
}

int_enum_from_sql!(JobType);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JobStatus {
    Queued,
    Running,
}

impl From<JobStatus> for i16 {
    fn from(value: JobStatus) -> i16 {
        match value {
            JobStatus::Queued => 1,
            JobStatus::Running => 2,
        }
    }
}

impl TryFrom<i16> for JobStatus {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let job_status = match value {
            1 => Self::Queued,
            2 => Self::Running,
            _ => return Err(DatabaseTypeError),
        };
        Ok(job_status)
    }
}

int_enum_from_sql!(JobStatus);

#[derive(FromSql)]
#[postgres(name = "background_job")]
pub struct DbBackgroundJob {
    pub id: Uuid,
    pub job_type: JobType,
    pub job_data: JsonValue,
    pub job_status: JobStatus,
    pub scheduled_for: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
