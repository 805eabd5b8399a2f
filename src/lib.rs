// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TCG Marketplace: client for buying, selling and trading trading cards
//!
//! This crate provides the session layer and API client behind the
//! marketplace app: durable session storage, the auth session controller
//! with its navigation guard, and the listing/feed endpoints.

pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::AppError;
use services::MarketplaceClient;
use session::{AuthGuard, AuthSession, SessionStore};
use std::sync::Arc;
use storage::{FileStore, KeyValueStore};

/// Shared application context, built once at startup and passed to
/// whatever needs the session or the API.
pub struct AppContext {
    pub config: Config,
    pub store: SessionStore,
    pub api: MarketplaceClient,
    pub session: AuthSession,
}

impl AppContext {
    /// Context persisting the session to `config.storage_path`.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let kv = Arc::new(FileStore::new(&config.storage_path));
        Self::with_storage(config, kv)
    }

    /// Context over caller-provided storage.
    pub fn with_storage(config: Config, kv: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let store = SessionStore::new(kv);
        let api = MarketplaceClient::new(&config, store.clone())?;
        let session = AuthSession::new(Arc::new(api.clone()), store.clone());

        Ok(Self {
            config,
            store,
            api,
            session,
        })
    }

    /// Guard following this context's session.
    pub fn guard(&self) -> AuthGuard {
        AuthGuard::new(&self.session)
    }
}
