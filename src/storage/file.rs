// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed storage: one JSON object of string values.

use super::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// The file holds a bearer token: owner read/write only.
#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Durable store persisted as a JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(OWNER_ONLY);

        let mut file = options.open(&tmp).await?;
        // A leftover temp file keeps its old mode on open
        #[cfg(unix)]
        file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY))
            .await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("auth_token").await.unwrap(), None);

        store.set("auth_token", "abc").await.unwrap();
        store.set("user_data", "{}").await.unwrap();

        // A fresh handle sees the same data
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("auth_token").await.unwrap().as_deref(), Some("abc"));

        reopened.remove("auth_token").await.unwrap();
        reopened.remove("auth_token").await.unwrap();
        assert_eq!(store.get("auth_token").await.unwrap(), None);
        assert_eq!(store.get("user_data").await.unwrap().as_deref(), Some("{}"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // Stale temp file from an interrupted write, world-readable
        tokio::fs::write(path.with_extension("json.tmp"), "{}").await.unwrap();
        tokio::fs::set_permissions(
            path.with_extension("json.tmp"),
            std::fs::Permissions::from_mode(0o644),
        )
        .await
        .unwrap();

        let store = FileStore::new(&path);
        store.set("auth_token", "secret").await.unwrap();

        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("auth_token").await,
            Err(StorageError::Corrupt(_))
        ));
    }
}
