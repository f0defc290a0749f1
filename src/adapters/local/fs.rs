use crate::ports::storage::StoragePort;
use crate::ports::BoxError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// A directory standing in for a bucket: key `a/b.mp4` lives at `<root>/a/b.mp4`.
#[derive(Clone, Debug)]
pub struct FsAdapter {
    root: PathBuf,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, BoxError> {
        let key_path = Path::new(key);
        let escapes = key_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(format!("invalid object key: {key:?}").into());
        }
        Ok(self.root.join(key_path))
    }
}

#[async_trait]
impl StoragePort for FsAdapter {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), BoxError> {
        let object = self.object_path(key)?;
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&object, local_path).await?;
        Ok(())
    }

    async fn upload(&self, key: &str, local_path: &Path) -> Result<(), BoxError> {
        let object = self.object_path(key)?;
        if let Some(parent) = object.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local_path, &object).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BoxError> {
        let object = self.object_path(key)?;
        tokio::fs::remove_file(object).await?;
        Ok(())
    }
}
