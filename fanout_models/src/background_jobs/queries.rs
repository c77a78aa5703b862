use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue};
use uuid::Uuid;

use crate::database::{DatabaseClient, DatabaseError};

use super::types::{DbBackgroundJob, JobStatus, JobType};

pub async fn enqueue_job(
    db_client: &impl DatabaseClient,
    job_type: JobType,
    job_data: &JsonValue,
    scheduled_for: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let job_id = Uuid::new_v4();
    db_client.execute(
        "
        INSERT INTO background_job (
            id,
            job_type,
            job_data,
            scheduled_for
        )
        VALUES ($1, $2, $3, $4)
        ",
        &[&job_id, &i16::from(job_type), &job_data, &scheduled_for],
    ).await?;
    Ok(())
}

/// Inserts jobs of the same type with a single statement
pub async fn enqueue_jobs(
    db_client: &impl DatabaseClient,
    job_type: JobType,
    jobs_data: &[JsonValue],
    scheduled_for: DateTime<Utc>,
) -> Result<u64, DatabaseError> {
    let job_ids: Vec<Uuid> = jobs_data.iter()
        .map(|_| Uuid::new_v4())
        .collect();
    let inserted_count = db_client.execute(
        "
        INSERT INTO background_job (
            id,
            job_type,
            job_data,
            scheduled_for
        )
        SELECT job.id, $2, job.job_data, $4
        FROM unnest($1::uuid[], $3::jsonb[]) AS job (id, job_data)
        ",
        &[&job_ids, &i16::from(job_type), &jobs_data, &scheduled_for],
    ).await?;
    Ok(inserted_count)
}

/// Claims a batch of queued jobs.
/// Running jobs are claimed again after `job_timeout` seconds.
pub async fn get_job_batch(
    db_client: &impl DatabaseClient,
    job_type: JobType,
    batch_size: u32,
    job_timeout: u32,
) -> Result<Vec<DbBackgroundJob>, DatabaseError> {
    let rows = db_client.query(
        "
        UPDATE background_job
        SET
            job_status = $1,
            updated_at = CURRENT_TIMESTAMP
        WHERE id IN (
            SELECT id
            FROM background_job
            WHERE
                job_type = $2
                AND scheduled_for < CURRENT_TIMESTAMP
                AND (
                    job_status = $3
                    OR job_status = $1
                    AND updated_at < CURRENT_TIMESTAMP - $5::integer * interval '1 second'
                )
            ORDER BY scheduled_for ASC
            LIMIT $4
            FOR UPDATE SKIP LOCKED
        )
        RETURNING background_job
        ",
        &[
            &i16::from(JobStatus::Running),
            &i16::from(job_type),
            &i16::from(JobStatus::Queued),
            &i64::from(batch_size),
            &i32::try_from(job_timeout).unwrap_or(i32::MAX),
        ],
    ).await?;
    let jobs = rows.iter()
        .map(|row| row.try_get("background_job"))
        .collect::<Result<_, _>>()?;
    Ok(jobs)
}

pub async fn delete_job_from_queue(
    db_client: &impl DatabaseClient,
    job_id: Uuid,
) -> Result<(), DatabaseError> {
    let deleted_count = db_client.execute(
        "
        DELETE FROM background_job
        WHERE id = $1
        ",
        &[&job_id],
    ).await?;
    if deleted_count == 0 {
        return Err(DatabaseError::NotFound("background job"));
    };
    Ok(())
}

pub async fn get_job_count(
    db_client: &impl DatabaseClient,
    job_type: JobType,
) -> Result<i64, DatabaseError> {
    let row = db_client.query_one(
        "
        SELECT count(background_job)
        FROM background_job
        WHERE job_type = $1
        ",
        &[&i16::from(job_type)],
    ).await?;
    let count = row.try_get("count")?;
    Ok(count)
}
