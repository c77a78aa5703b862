use serde::Serialize;
use serde_json::{Value as JsonValue};

use fanout_models::background_jobs::types::JobType;

use crate::collaborators::JobSink;
use crate::errors::ServiceError;
use crate::types::{
    FederationBatchEntry,
    RetractionReport,
    StreamEntryBatch,
};

fn to_jobs_data<T: Serialize>(items: &[T]) -> Vec<JsonValue> {
    items.iter()
        .map(|item| {
            serde_json::to_value(item)
                .expect("job data should be serializable")
        })
        .collect()
}

/// Collects jobs produced during a call and submits them at once
#[derive(Default)]
pub struct BatchDispatcher {
    stream_entry_batches: Vec<StreamEntryBatch>,
    federation_entries: Vec<FederationBatchEntry>,
}

impl BatchDispatcher {
    pub fn add_stream_entry_batches(
        &mut self,
        batches: Vec<StreamEntryBatch>,
    ) -> () {
        self.stream_entry_batches.extend(batches);
    }

    pub fn add_federation_entries(
        &mut self,
        entries: Vec<FederationBatchEntry>,
    ) -> () {
        self.federation_entries.extend(entries);
    }

    /// Pushes each non-empty sequence to the job sink with a single call
    pub async fn flush(
        self,
        job_sink: &dyn JobSink,
        report: &mut RetractionReport,
    ) -> Result<(), ServiceError> {
        if !self.stream_entry_batches.is_empty() {
            job_sink.push_bulk(
                JobType::DistributeStreamEntries,
                to_jobs_data(&self.stream_entry_batches),
            ).await?;
            report.stream_entry_batches = self.stream_entry_batches.len();
        };
        if !self.federation_entries.is_empty() {
            job_sink.push_bulk(
                JobType::DeliverRetraction,
                to_jobs_data(&self.federation_entries),
            ).await?;
            report.federation_entries = self.federation_entries.len();
        };
        Ok(())
    }
}
