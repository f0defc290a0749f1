use super::BoxError;
use crate::domain::audit::AuditRecord;
use async_trait::async_trait;

/// Append-only sink for remux audit records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogPort: Send + Sync {
    async fn log_remux(&self, record: &AuditRecord) -> Result<(), BoxError>;
}
