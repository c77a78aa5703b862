use thiserror::Error;

use fanout_models::database::DatabaseError;

/// Error returned by an external collaborator
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RetractionError {
    /// Posts could not be loaded or deleted
    #[error("storage failure: {0}")]
    StorageFailure(#[source] ServiceError),

    /// Batched jobs were not accepted by the queue
    #[error("job sink failure: {0}")]
    JobSinkFailure(#[source] ServiceError),
}
