use crate::ports::storage::StoragePort;
use crate::ports::BoxError;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{info, info_span, warn, Instrument};

/// S3Adapter implements StoragePort for one S3 bucket.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), BoxError> {
        let span = info_span!("download", key, dest = %local_path.display());
        async {
            info!("starting download");
            if let Some(parent) = local_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    warn!(error = %e, "could not create directories");
                    e
                })?;
            }

            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "could not download file");
                    e
                })?;

            let mut body = resp.body;
            let mut file = tokio::fs::File::create(local_path).await?;
            let mut bytes = 0u64;
            while let Some(chunk) = body.try_next().await? {
                file.write_all(&chunk).await?;
                bytes += chunk.len() as u64;
            }
            file.flush().await?;

            info!(bytes, "download complete");
            Ok::<(), BoxError>(())
        }
        .instrument(span)
        .await
    }

    async fn upload(&self, key: &str, local_path: &Path) -> Result<(), BoxError> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            warn!(key, source_file = %local_path.display(), error = %e, "could not open source file");
            e
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!(key, source_file = %local_path.display(), error = %e, "could not upload file");
                e
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BoxError> {
        let span = info_span!("delete", key, bucket = %self.bucket);
        async {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "could not delete object");
                    e
                })?;

            info!("object deleted");
            Ok::<(), BoxError>(())
        }
        .instrument(span)
        .await
    }
}
