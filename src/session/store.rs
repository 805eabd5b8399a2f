// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted session: the auth token and the user record.
//!
//! The lenient accessors never fail. Storage problems are logged and read
//! as "absent", writes that fail are logged and dropped.

use crate::models::{SessionToken, User};
use crate::storage::{keys, KeyValueStore, StorageError};
use std::sync::Arc;

/// Token and user persistence on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored token, or the storage error.
    pub async fn try_token(&self) -> Result<Option<SessionToken>, StorageError> {
        Ok(self
            .kv
            .get(keys::AUTH_TOKEN)
            .await?
            .filter(|t| !t.is_empty())
            .map(SessionToken::new))
    }

    /// Stored user, or the storage error. Unparseable data is `Corrupt`.
    pub async fn try_user(&self) -> Result<Option<User>, StorageError> {
        match self.kv.get(keys::USER_DATA).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Corrupt(format!("user_data: {}", e))),
            None => Ok(None),
        }
    }

    pub async fn get_token(&self) -> Option<SessionToken> {
        match self.try_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Error getting token");
                None
            }
        }
    }

    pub async fn get_user(&self) -> Option<User> {
        match self.try_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "Error getting user data");
                None
            }
        }
    }

    pub async fn set_token(&self, token: &SessionToken) {
        if let Err(e) = self.kv.set(keys::AUTH_TOKEN, token.as_str()).await {
            tracing::error!(error = %e, "Error setting token");
        }
    }

    pub async fn set_user(&self, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Error serializing user data");
                return;
            }
        };

        if let Err(e) = self.kv.set(keys::USER_DATA, &raw).await {
            tracing::error!(error = %e, user_id = user.id, "Error setting user data");
        }
    }

    /// Remove both entries. Absent keys are not an error.
    pub async fn clear_all(&self) {
        if let Err(e) = self.kv.remove(keys::AUTH_TOKEN).await {
            tracing::error!(error = %e, "Error removing token");
        }
        if let Err(e) = self.kv.remove(keys::USER_DATA).await {
            tracing::error!(error = %e, "Error removing user data");
        }
    }
}
