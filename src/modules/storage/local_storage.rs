//! Local filesystem storage
//!
//! Stores uploaded packages and thumbnails below a media root directory.
//! Keys are relative, `/`-separated paths such as `software_files/tool.zip`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::shared::validation::sanitize_filename;

/// Blob storage used by the catalog for package files and thumbnails
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `prefix/` using `filename` (sanitized, deduplicated).
    /// Returns the key the blob was stored under.
    async fn save(&self, prefix: &str, filename: &str, data: Vec<u8>) -> Result<String>;

    /// Read the whole blob; `NotFound` when the key does not exist
    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove a blob; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Public URL where the media server exposes `key`
    fn url(&self, key: &str) -> String;
}

/// Storage rooted at a directory on the local filesystem
pub struct LocalStorage {
    root: PathBuf,
    media_url: String,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.media_root),
            media_url: config.media_url.clone(),
        }
    }

    /// Create the media root if needed
    pub async fn ensure_root_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Media root ready at {}", self.root.display());
        Ok(())
    }

    /// Resolve a key to a path, refusing anything that escapes the root
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if key.is_empty() || !safe {
            return Err(AppError::BadRequest(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.root.join(relative))
    }

    /// Create the file for `key` only if nobody holds that name yet
    async fn claim(&self, key: &str) -> Result<Option<(PathBuf, File)>> {
        let path = self.resolve(key)?;

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => Ok(Some((path, file))),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

/// `prefix/name_abcdef12.ext` for a taken `prefix/name.ext`
fn suffixed_key(prefix: &str, name: &str) -> String {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}/{}_{}.{}", prefix, stem, suffix, ext),
        None => format!("{}/{}_{}", prefix, name, suffix),
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, prefix: &str, filename: &str, data: Vec<u8>) -> Result<String> {
        let name = sanitize_filename(filename);
        fs::create_dir_all(self.resolve(prefix)?).await?;

        let mut key = format!("{}/{}", prefix, name);
        let (path, mut file) = loop {
            match self.claim(&key).await? {
                Some(claimed) => break claimed,
                None => key = suffixed_key(prefix, &name),
            }
        };

        let written = async {
            file.write_all(&data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // Release the name so a half-written blob is never served
            let _ = fs::remove_file(&path).await;
            return Err(AppError::Storage(e));
        }

        debug!("Stored {} bytes at {}", data.len(), key);
        Ok(key)
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}{}", self.media_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(&StorageConfig {
            media_root: dir.path().to_string_lossy().to_string(),
            media_url: "/media/".to_string(),
        })
    }

    #[tokio::test]
    async fn test_save_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let key = storage
            .save("software_files", "tool.zip", b"PK\x03\x04".to_vec())
            .await
            .unwrap();

        assert_eq!(key, "software_files/tool.zip");
        assert_eq!(storage.read(&key).await.unwrap(), b"PK\x03\x04".to_vec());
        assert_eq!(storage.url(&key), "/media/software_files/tool.zip");
    }

    #[tokio::test]
    async fn test_save_deduplicates_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let first = storage
            .save("software_files", "tool.zip", vec![1])
            .await
            .unwrap();
        let second = storage
            .save("software_files", "tool.zip", vec![2])
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("software_files/tool_"));
        assert!(second.ends_with(".zip"));
        assert_eq!(storage.read(&first).await.unwrap(), vec![1]);
        assert_eq!(storage.read(&second).await.unwrap(), vec![2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_never_share_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(storage(&dir));

        for round in 0..25 {
            let name = format!("tool{}.zip", round);
            let first = tokio::spawn({
                let storage = Arc::clone(&storage);
                let name = name.clone();
                async move { storage.save("software_files", &name, vec![1; 4096]).await }
            });
            let second = tokio::spawn({
                let storage = Arc::clone(&storage);
                async move { storage.save("software_files", &name, vec![2; 4096]).await }
            });

            let first = first.await.unwrap().unwrap();
            let second = second.await.unwrap().unwrap();

            assert_ne!(first, second, "round {}", round);
            assert_eq!(storage.read(&first).await.unwrap(), vec![1; 4096]);
            assert_eq!(storage.read(&second).await.unwrap(), vec![2; 4096]);
        }
    }

    #[tokio::test]
    async fn test_save_strips_client_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let key = storage
            .save("software_files", "../../outside.exe", vec![0])
            .await
            .unwrap();

        assert_eq!(key, "software_files/outside.exe");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let err = storage.read("software_files/nope.zip").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        assert!(matches!(
            storage.read("../secret").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            storage.read("/etc/passwd").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let key = storage
            .save("software_thumbnails", "logo.png", vec![9])
            .await
            .unwrap();
        storage.delete(&key).await.unwrap();
        storage.delete(&key).await.unwrap();

        assert!(matches!(
            storage.read(&key).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
