use crate::config::RemuxConfig;
use crate::domain::audit::AuditRecord;
use crate::domain::av::{RemuxExecutor, TranscodeError};
use crate::domain::event::{RemuxEvent, S3Event};
use crate::domain::jobs::{is_supported_input, RemuxJob};
use crate::ports::audit::AuditLogPort;
use crate::ports::storage::StoragePort;
use crate::ports::BoxError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};

pub const SKIPPED: &str = "skipped";
pub const UNSUPPORTED_SKIPPED: &str = "not a supported input, skipped";

pub const UNSUPPORTED_INPUT: &str = "not a supported input";
pub const DOWNLOAD_FAILED: &str = "download failed";
pub const UPLOAD_FAILED: &str = "could not upload file";
pub const TRANSCODER_UNAVAILABLE: &str = "transcoder unavailable";

#[derive(Debug, Error)]
pub enum RemuxError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("could not download {key}: {source}")]
    Download {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Transcoder(#[from] TranscodeError),
}

/// Runs one remux job per storage notification:
/// download, remux, upload, clean up, optionally delete the source, and audit.
pub struct RemuxService<S, A, T> {
    config: Arc<RemuxConfig>,
    input_storage: S,
    output_storage: S,
    audit_log: A,
    remuxer: T,
}

impl<S, A, T> RemuxService<S, A, T>
where
    S: StoragePort,
    A: AuditLogPort,
    T: RemuxExecutor,
{
    pub fn new(
        config: Arc<RemuxConfig>,
        input_storage: S,
        output_storage: S,
        audit_log: A,
        remuxer: T,
    ) -> Self {
        Self {
            config,
            input_storage,
            output_storage,
            audit_log,
            remuxer,
        }
    }

    pub async fn handle_notification(
        &self,
        notification: &S3Event,
        request_id: &str,
    ) -> Result<String, RemuxError> {
        if notification.records.len() > 1 {
            warn!(
                records = notification.records.len(),
                "notification has several records, only the first is processed"
            );
        }

        let event =
            RemuxEvent::from_notification(notification).map_err(RemuxError::InvalidEvent)?;
        self.handle(&event, request_id).await
    }

    /// Returns a short summary on every path except a failed download.
    pub async fn handle(
        &self,
        event: &RemuxEvent,
        request_id: &str,
    ) -> Result<String, RemuxError> {
        let span = info_span!(
            "remux",
            request_id,
            source_bucket = %event.source_bucket,
            source_key = %event.source_key,
            destination_bucket = %self.config.output_bucket
        );

        self.run(event, request_id).instrument(span).await
    }

    async fn run(&self, event: &RemuxEvent, request_id: &str) -> Result<String, RemuxError> {
        let started_at = Instant::now();
        info!("starting event handling");

        if event.source_bucket != self.config.input_bucket {
            warn!("source bucket not correct. stopping.");
            return Ok(SKIPPED.to_string());
        }

        if !is_supported_input(&event.source_key) {
            warn!("file not a supported input. skipping");
            let duration = started_at.elapsed().as_millis() as u64;
            self.record(&event.source_key, "", duration, request_id, UNSUPPORTED_INPUT)
                .await;
            return Ok(UNSUPPORTED_SKIPPED.to_string());
        }

        let job = RemuxJob::new(&event.source_key, &self.config.download_dir, started_at);

        if let Err(source) = self
            .input_storage
            .download(&job.source_key, &job.local_input)
            .await
        {
            error!(error = %source, "could not download");
            self.record_job(&job, request_id, DOWNLOAD_FAILED).await;
            return Err(RemuxError::Download {
                key: job.source_key,
                source,
            });
        }
        info!(temp_file = %job.local_input.display(), "file downloaded");

        info!(
            dest_key = %job.dest_key,
            dest_file = %job.local_output.display(),
            "starting remux"
        );
        match self.remuxer.remux(&job.local_input, &job.local_output).await {
            Ok(()) => info!("finished remux"),
            Err(e) if e.is_fatal() => {
                error!(error = %e, "transcoder could not be started");
                remove_scratch(&job.local_input, "temp file").await;
                self.record_job(&job, request_id, TRANSCODER_UNAVAILABLE).await;
                return Err(e.into());
            }
            // Upload is still attempted and fails on its own if there is no output.
            Err(e) => warn!(error = %e, "remux failed"),
        }

        let mut success = true;

        info!("starting remuxed upload");
        match self
            .output_storage
            .upload(&job.dest_key, &job.local_output)
            .await
        {
            Ok(()) => info!("completed remux upload"),
            Err(e) => {
                warn!(error = %e, "could not upload file");
                self.record_job(&job, request_id, UPLOAD_FAILED).await;
                success = false;
            }
        }

        remove_scratch(&job.local_output, "dest file").await;
        remove_scratch(&job.local_input, "temp file").await;

        if success && self.config.delete_when_done {
            let message = match self.input_storage.delete(&job.source_key).await {
                Ok(()) => String::new(),
                Err(e) => {
                    warn!(error = %e, "could not delete");
                    e.to_string()
                }
            };
            self.record_job(&job, request_id, &message).await;
        }

        info!(dest_key = %job.dest_key, "all done");
        Ok(format!("{} {}", event.source_bucket, event.source_key))
    }

    async fn record_job(&self, job: &RemuxJob, request_id: &str, error: &str) {
        self.record(&job.source_key, &job.dest_key, job.elapsed_ms(), request_id, error)
            .await;
    }

    // Audit failures never change the outcome of the job.
    async fn record(
        &self,
        input_key: &str,
        output_key: &str,
        duration: u64,
        request_id: &str,
        error: &str,
    ) {
        let record = AuditRecord::new(input_key, duration, request_id, output_key, error);

        if let Err(e) = self.audit_log.log_remux(&record).await {
            warn!(
                input_key,
                output_key,
                recorded_error = error,
                error = %e,
                "could not record"
            );
        }
    }
}

async fn remove_scratch(path: &Path, what: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!(path = %path.display(), "removed {}", what),
        Err(e) => warn!(path = %path.display(), error = %e, "could not delete {}", what),
    }
}
