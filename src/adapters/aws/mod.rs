//! AWS adapters: S3 object storage, the DynamoDB remux log and the Lambda entry point.

pub mod dynamodb;
pub mod lambda;
pub mod s3;

pub use dynamodb::DynamoAuditLog;
pub use lambda::handle_invocation;
pub use s3::S3Adapter;
