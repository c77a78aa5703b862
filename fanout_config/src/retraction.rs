use serde::Deserialize;

use super::ConfigError;

const fn default_deletion_batch_size() -> usize { 1000 }
const fn default_stream_entry_batch_size() -> usize { 100 }
const fn default_queue_batch_size() -> u32 { 10 }
const fn default_job_timeout() -> u32 { 3600 } // 1 hour

#[derive(Clone, Deserialize)]
pub struct RetractionConfig {
    /// Number of post IDs in a single DELETE statement
    #[serde(default = "default_deletion_batch_size")]
    pub deletion_batch_size: usize,

    /// Max number of stream entries in a distribution job
    #[serde(default = "default_stream_entry_batch_size")]
    pub stream_entry_batch_size: usize,

    /// Number of removal jobs claimed by the worker at once
    #[serde(default = "default_queue_batch_size")]
    pub queue_batch_size: u32,

    /// Running jobs are re-claimed after this period (in seconds)
    #[serde(default = "default_job_timeout")]
    pub job_timeout: u32,
}

impl RetractionConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.deletion_batch_size == 0 {
            return Err(ConfigError("deletion_batch_size must be positive"));
        };
        if self.stream_entry_batch_size == 0 {
            return Err(ConfigError("stream_entry_batch_size must be positive"));
        };
        if self.queue_batch_size == 0 {
            return Err(ConfigError("queue_batch_size must be positive"));
        };
        Ok(())
    }
}

impl Default for RetractionConfig {
    fn default() -> Self {
        Self {
            deletion_batch_size: default_deletion_batch_size(),
            stream_entry_batch_size: default_stream_entry_batch_size(),
            queue_batch_size: default_queue_batch_size(),
            job_timeout: default_job_timeout(),
        }
    }
}
