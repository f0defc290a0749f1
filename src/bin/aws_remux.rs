//! AWS Remux Binary
//!
//! Deployed as a Lambda function triggered by S3 object-created notifications.
//! Each invocation remuxes one object and returns a summary. Audit records carry
//! the invocation's request id.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region
//! - DOWNLOAD_DIR: local scratch directory (must exist)
//! - INPUT_BUCKET_NAME: bucket whose notifications are accepted
//! - OUTPUT_BUCKET_NAME: bucket receiving the remuxed files
//! - REMUX_LOG_TABLE_NAME: DynamoDB table for audit records
//! - NOTIFICATION_ARN_TOPIC: optional
//! - DELETE_WHEN_DONE: "true" to delete sources after a successful remux
//! - FFMPEG_PATH: optional, defaults to /opt/bin/ffmpeg

use bucket_filler::adapters::aws::{handle_invocation, DynamoAuditLog, S3Adapter};
use bucket_filler::domain::av::FfmpegRemuxer;
use bucket_filler::domain::event::S3Event;
use bucket_filler::{RemuxConfig, RemuxService};
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match RemuxConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Load AWS config
    let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws);
    let dynamo_client = aws_sdk_dynamodb::Client::new(&aws);

    let service = RemuxService::new(
        config.clone(),
        S3Adapter::new(s3_client.clone(), config.input_bucket.clone()),
        S3Adapter::new(s3_client, config.output_bucket.clone()),
        DynamoAuditLog::new(dynamo_client, config.remux_log_table.clone()),
        FfmpegRemuxer::new(&config.ffmpeg_path),
    );

    let service = &service;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        match handle_invocation(service, event).await {
            Ok(summary) => {
                info!(%summary, "event handled");
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "event handling failed");
                Err(lambda_runtime::Error::from(e))
            }
        }
    }))
    .await
}
