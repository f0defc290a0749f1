//! Lambda entry point: one S3 notification per invocation.

use crate::application::{RemuxError, RemuxService};
use crate::domain::av::RemuxExecutor;
use crate::domain::event::S3Event;
use crate::ports::audit::AuditLogPort;
use crate::ports::storage::StoragePort;
use lambda_runtime::LambdaEvent;

/// Handle one invocation. The audit records carry the invocation's request id.
pub async fn handle_invocation<S, A, T>(
    service: &RemuxService<S, A, T>,
    event: LambdaEvent<S3Event>,
) -> Result<String, RemuxError>
where
    S: StoragePort,
    A: AuditLogPort,
    T: RemuxExecutor,
{
    let (notification, context) = event.into_parts();
    service
        .handle_notification(&notification, &context.request_id)
        .await
}
