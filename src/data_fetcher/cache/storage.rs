//! Persisted copies of the reference datasets

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::cache_files;
use crate::error::AppError;

/// The two reference datasets kept in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Stations,
    Platforms,
}

impl ReferenceKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReferenceKind::Stations => cache_files::STATIONS,
            ReferenceKind::Platforms => cache_files::PLATFORMS,
        }
    }
}

/// Reads and writes the raw JSON of the reference datasets.
pub trait CacheStorage: Send + Sync {
    /// Reads the persisted JSON of a dataset.
    fn read(&self, kind: ReferenceKind) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Replaces the persisted JSON of a dataset.
    fn write(
        &self,
        kind: ReferenceKind,
        body: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Human readable location of a dataset, used in error messages
    fn location(&self, kind: ReferenceKind) -> String;
}

/// Stores each dataset as a JSON file in one directory.
#[derive(Debug, Clone)]
pub struct FileCacheStorage {
    dir: PathBuf,
}

impl FileCacheStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ReferenceKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl CacheStorage for FileCacheStorage {
    async fn read(&self, kind: ReferenceKind) -> Result<String, AppError> {
        let path = self.path(kind);
        debug!("Reading cached {:?} from {}", kind, path.display());
        fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::cache_read(path.display().to_string(), e.to_string()))
    }

    /// Writes to a sibling temp file and renames it over the old copy, so readers
    /// never see a half written dataset.
    async fn write(&self, kind: ReferenceKind, body: &str) -> Result<(), AppError> {
        let path = self.path(kind);
        let to_error = |e: std::io::Error| AppError::cache_write(path.display().to_string(), e.to_string());

        fs::create_dir_all(&self.dir).await.map_err(to_error)?;

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await.map_err(to_error)?;
        file.write_all(body.as_bytes()).await.map_err(to_error)?;
        file.flush().await.map_err(to_error)?;
        drop(file);

        fs::rename(&tmp_path, &path).await.map_err(to_error)?;
        debug!("Wrote {} bytes of {:?} to {}", body.len(), kind, path.display());
        Ok(())
    }

    fn location(&self, kind: ReferenceKind) -> String {
        self.path(kind).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path());

        storage
            .write(ReferenceKind::Stations, r#"{"MTS":"Monument"}"#)
            .await
            .unwrap();

        let body = storage.read(ReferenceKind::Stations).await.unwrap();
        assert_eq!(body, r#"{"MTS":"Monument"}"#);
        assert!(dir.path().join("stations.json").exists());
        assert!(!dir.path().join("stations.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_replaces_wholesale() {
        let dir = tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path());

        storage
            .write(ReferenceKind::Platforms, r#"{"MTS":[{"platformNumber":1}],"CEN":[]}"#)
            .await
            .unwrap();
        storage
            .write(ReferenceKind::Platforms, "{}")
            .await
            .unwrap();

        assert_eq!(storage.read(ReferenceKind::Platforms).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path().join("nested").join("cache"));

        storage.write(ReferenceKind::Stations, "{}").await.unwrap();
        assert!(storage.path(ReferenceKind::Stations).exists());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_cache_read_error() {
        let dir = tempdir().unwrap();
        let storage = FileCacheStorage::new(dir.path());

        let error = storage.read(ReferenceKind::Platforms).await.unwrap_err();
        match error {
            AppError::CacheRead { path, .. } => assert!(path.ends_with("platforms.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_write_into_file_path_is_cache_write_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let storage = FileCacheStorage::new(&blocker);

        let error = storage.write(ReferenceKind::Stations, "{}").await.unwrap_err();
        assert!(matches!(error, AppError::CacheWrite { .. }));
    }
}
