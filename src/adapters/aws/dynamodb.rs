use crate::domain::audit::AuditRecord;
use crate::ports::audit::AuditLogPort;
use crate::ports::BoxError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::warn;

/// DynamoAuditLog implements AuditLogPort as one DynamoDB item per record.
#[derive(Clone)]
pub struct DynamoAuditLog {
    client: Client,
    table_name: String,
}

impl DynamoAuditLog {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl AuditLogPort for DynamoAuditLog {
    async fn log_remux(&self, record: &AuditRecord) -> Result<(), BoxError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("input_key", AttributeValue::S(record.input_key.clone()))
            .item("timestamp", AttributeValue::N(record.timestamp.to_string()))
            .item("duration", AttributeValue::N(record.duration.to_string()))
            .item("request_id", AttributeValue::S(record.request_id.clone()))
            .item("output_key", AttributeValue::S(record.output_key.clone()))
            .item("successful", AttributeValue::Bool(record.successful()))
            .item("error", AttributeValue::S(record.error.clone()))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "unable to store remux record");
                e
            })?;
        Ok(())
    }
}
