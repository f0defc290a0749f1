//! Local Remux Binary - the same pipeline over the filesystem
//!
//! Each bucket is a directory under LOCAL_STORAGE_ROOT and audit records are
//! appended to LOCAL_AUDIT_LOG. Reads one S3-style notification from the file
//! given as first argument, or from stdin.

use bucket_filler::adapters::local::{FsAdapter, JsonlAuditLog};
use bucket_filler::domain::av::FfmpegRemuxer;
use bucket_filler::domain::event::S3Event;
use bucket_filler::{LocalConfig, RemuxConfig, RemuxService};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match RemuxConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let local = LocalConfig::from_env();

    let service = RemuxService::new(
        config.clone(),
        FsAdapter::new(local.storage_root.join(&config.input_bucket)),
        FsAdapter::new(local.storage_root.join(&config.output_bucket)),
        JsonlAuditLog::new(&local.audit_log_path),
        FfmpegRemuxer::new(&config.ffmpeg_path),
    );

    let body = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path).await,
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .map(|_| body)
        }
    };
    let body = body.unwrap_or_else(|e| {
        eprintln!("Failed to read notification: {:?}", e);
        std::process::exit(1);
    });

    let notification = match S3Event::from_json(&body) {
        Ok(event) => event,
        Err(e) => {
            eprintln!("Failed to parse notification: {:?}", e);
            std::process::exit(1);
        }
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    match service.handle_notification(&notification, &request_id).await {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("Failed to process video: {}", e);
            std::process::exit(1);
        }
    }
}
