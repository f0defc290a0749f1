use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Extension accepted as remux input (compared case-insensitively).
pub const SOURCE_EXTENSION: &str = ".mp4";

/// Extension of the remuxed output container.
pub const TARGET_EXTENSION: &str = ".flv";

/// One remux run: the keys it reads and writes and its local scratch files.
///
/// Scratch paths are fresh UUIDs so concurrent or replayed jobs never share files.
#[derive(Debug, Clone)]
pub struct RemuxJob {
    pub source_key: String,
    pub dest_key: String,
    pub local_input: PathBuf,
    pub local_output: PathBuf,
    pub started_at: Instant,
}

impl RemuxJob {
    pub fn new(source_key: &str, download_dir: &Path, started_at: Instant) -> Self {
        Self {
            source_key: source_key.to_string(),
            dest_key: dest_key_for(source_key),
            local_input: scratch_path(download_dir, key_extension(source_key)),
            local_output: scratch_path(download_dir, TARGET_EXTENSION),
            started_at,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

pub fn is_supported_input(key: &str) -> bool {
    key.to_lowercase().ends_with(SOURCE_EXTENSION)
}

/// Extension of the last path segment including the dot, or "" if there is none.
pub fn key_extension(key: &str) -> &str {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    match key[name_start..].rfind('.') {
        Some(dot) => &key[name_start + dot..],
        None => "",
    }
}

/// Replace the key's extension with the target container extension.
pub fn dest_key_for(source_key: &str) -> String {
    let stem = &source_key[..source_key.len() - key_extension(source_key).len()];
    format!("{stem}{TARGET_EXTENSION}")
}

fn scratch_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(format!("{}{}", Uuid::new_v4(), extension))
}
