//! Storage-change notifications and the event extracted from them.

use serde::Deserialize;

/// S3 event notification as delivered to the function.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// Percent-encoded object key
    pub key: String,
}

impl S3Event {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Bucket and decoded key of the object that triggered a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxEvent {
    pub source_bucket: String,
    pub source_key: String,
}

impl RemuxEvent {
    /// Take the first record of the notification and decode its key.
    pub fn from_notification(event: &S3Event) -> Result<Self, String> {
        let record = event
            .records
            .first()
            .ok_or_else(|| "notification has no records".to_string())?;

        let source_key = decode_key(&record.s3.object.key)?;

        Ok(Self {
            source_bucket: record.s3.bucket.name.clone(),
            source_key,
        })
    }
}

/// Decode an object key the way S3 encodes it in notifications:
/// `+` stands for a space, everything else is percent-encoded UTF-8.
pub fn decode_key(raw: &str) -> Result<String, String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| format!("invalid object key {raw:?}: {e}"))
}
