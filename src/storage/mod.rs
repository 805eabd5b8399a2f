// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value storage.

pub mod file;

pub use file::FileStore;

use async_trait::async_trait;

/// Key names as constants.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    /// JSON-serialized `User`
    pub const USER_DATA: &str = "user_data";
}

/// String key-value storage with async access.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that is not present succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
