//! Configuration loaded once at process startup.

use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Location of the ffmpeg binary inside the Lambda layer.
pub const DEFAULT_FFMPEG_PATH: &str = "/opt/bin/ffmpeg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("download dir does not exist: {}", .0.display())]
    DownloadDirMissing(PathBuf),
}

/// Settings shared by every remux job handled by this process.
#[derive(Clone, Debug)]
pub struct RemuxConfig {
    /// Directory that receives downloaded sources and remuxed outputs
    pub download_dir: PathBuf,
    /// Bucket whose notifications we accept
    pub input_bucket: String,
    /// Bucket that receives the remuxed files
    pub output_bucket: String,
    /// Audit log destination (DynamoDB table name)
    pub remux_log_table: String,
    /// Notification topic, currently informational only
    pub notification_topic: Option<String>,
    /// Delete the source object after a successful remux
    pub delete_when_done: bool,
    /// Path to the ffmpeg executable
    pub ffmpeg_path: PathBuf,
}

impl RemuxConfig {
    /// Load configuration from environment variables.
    /// Fails if any required variable is missing or the download dir does not exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let download_dir = PathBuf::from(required("DOWNLOAD_DIR")?);
        if !download_dir.exists() {
            return Err(ConfigError::DownloadDirMissing(download_dir));
        }

        let output_bucket = required("OUTPUT_BUCKET_NAME")?;
        let input_bucket = required("INPUT_BUCKET_NAME")?;
        let remux_log_table = required("REMUX_LOG_TABLE_NAME")?;

        let notification_topic = lookup("NOTIFICATION_ARN_TOPIC").filter(|v| !v.is_empty());
        if notification_topic.is_none() {
            warn!("NOTIFICATION_ARN_TOPIC not set. Will not send notifications");
        }

        let delete_when_done = lookup("DELETE_WHEN_DONE").as_deref() == Some("true");
        if delete_when_done {
            info!("will delete objects on completion");
        }

        let ffmpeg_path = lookup("FFMPEG_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG_PATH));

        Ok(Self {
            download_dir,
            input_bucket,
            output_bucket,
            remux_log_table,
            notification_topic,
            delete_when_done,
            ffmpeg_path,
        })
    }
}

/// Extra settings for running the pipeline against the local filesystem.
#[cfg(feature = "local")]
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Directory holding one sub-directory per bucket
    pub storage_root: PathBuf,
    /// File that receives one JSON audit record per line
    pub audit_log_path: PathBuf,
}

#[cfg(feature = "local")]
impl LocalConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            storage_root: env::var("LOCAL_STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./buckets")),
            audit_log_path: env::var("LOCAL_AUDIT_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./remux_log.jsonl")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(vars: HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> {
        move |name: &str| vars.get(name).cloned()
    }

    fn base_vars(dir: &std::path::Path) -> HashMap<&'static str, String> {
        HashMap::from([
            ("DOWNLOAD_DIR", dir.to_string_lossy().to_string()),
            ("OUTPUT_BUCKET_NAME", "out".to_string()),
            ("INPUT_BUCKET_NAME", "in".to_string()),
            ("REMUX_LOG_TABLE_NAME", "remux-log".to_string()),
        ])
    }

    #[test]
    fn test_loads_required_values_with_defaults() {
        let dir = tempdir().unwrap();
        let config = RemuxConfig::from_lookup(lookup_from(base_vars(dir.path()))).unwrap();

        assert_eq!(config.input_bucket, "in");
        assert_eq!(config.output_bucket, "out");
        assert_eq!(config.remux_log_table, "remux-log");
        assert!(config.notification_topic.is_none());
        assert!(!config.delete_when_done);
        assert_eq!(config.ffmpeg_path, PathBuf::from(DEFAULT_FFMPEG_PATH));
    }

    #[test]
    fn test_missing_required_value() {
        let dir = tempdir().unwrap();
        let mut vars = base_vars(dir.path());
        vars.remove("INPUT_BUCKET_NAME");

        let err = RemuxConfig::from_lookup(lookup_from(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("INPUT_BUCKET_NAME")));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let dir = tempdir().unwrap();
        let mut vars = base_vars(dir.path());
        vars.insert("OUTPUT_BUCKET_NAME", String::new());

        let err = RemuxConfig::from_lookup(lookup_from(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OUTPUT_BUCKET_NAME")));
    }

    #[test]
    fn test_download_dir_must_exist() {
        let dir = tempdir().unwrap();
        let mut vars = base_vars(dir.path());
        vars.insert("DOWNLOAD_DIR", dir.path().join("nope").to_string_lossy().to_string());

        let err = RemuxConfig::from_lookup(lookup_from(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::DownloadDirMissing(_)));
    }

    #[test]
    fn test_delete_when_done_requires_exact_true() {
        let dir = tempdir().unwrap();

        let mut vars = base_vars(dir.path());
        vars.insert("DELETE_WHEN_DONE", "true".to_string());
        vars.insert("FFMPEG_PATH", "/usr/bin/ffmpeg".to_string());
        vars.insert("NOTIFICATION_ARN_TOPIC", "arn:aws:sns:topic".to_string());
        let config = RemuxConfig::from_lookup(lookup_from(vars)).unwrap();
        assert!(config.delete_when_done);
        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(config.notification_topic.as_deref(), Some("arn:aws:sns:topic"));

        let mut vars = base_vars(dir.path());
        vars.insert("DELETE_WHEN_DONE", "TRUE".to_string());
        let config = RemuxConfig::from_lookup(lookup_from(vars)).unwrap();
        assert!(!config.delete_when_done);
    }
}
