// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tcg_marketplace::config::Config;
use tcg_marketplace::error::{ApiError, AppError};
use tcg_marketplace::models::{SessionToken, User};
use tcg_marketplace::services::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
use tcg_marketplace::session::{AuthSession, SessionStore};
use tcg_marketplace::storage::{keys, KeyValueStore, StorageError};
use tcg_marketplace::AppContext;
use tokio::sync::Notify;

/// User returned by the fake backends.
#[allow(dead_code)]
pub fn sample_user() -> User {
    serde_json::from_value(sample_user_json()).expect("sample user")
}

#[allow(dead_code)]
pub fn sample_user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "test@example.com",
        "first_name": "Test",
        "last_name": "User",
        "user_name": "testuser",
        "verified": true,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// Map-backed store. Reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.entries.lock() {
            map.extend(entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        }
        store
    }

    /// Make every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`remove` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value for `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|m| m.is_empty()).unwrap_or(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Memory store already holding a token and/or a user.
#[allow(dead_code)]
pub fn seeded_store(token: Option<&str>, user: Option<&User>) -> Arc<MemoryStore> {
    let user_json = user.map(|u| serde_json::to_string(u).expect("serialize user"));
    let mut entries = Vec::new();
    if let Some(token) = token {
        entries.push((keys::AUTH_TOKEN, token));
    }
    if let Some(raw) = user_json.as_deref() {
        entries.push((keys::USER_DATA, raw));
    }
    Arc::new(MemoryStore::with_entries(entries))
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake backend");
    });
    format!("http://{}", addr)
}

/// App context pointed at `base_url` with in-memory storage.
#[allow(dead_code)]
pub fn test_context(base_url: &str, kv: Arc<MemoryStore>) -> AppContext {
    let config = Config::test_default()
        .with_api_base_url(base_url)
        .expect("valid base url");
    AppContext::with_storage(config, kv).expect("build context")
}

/// What a mocked remote call should do.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Outcome {
    Succeed(AuthResponse),
    Fail(ApiError),
}

impl Outcome {
    fn into_result(self) -> Result<AuthResponse, AppError> {
        match self {
            Outcome::Succeed(r) => Ok(r),
            Outcome::Fail(e) => Err(AppError::Api(e)),
        }
    }
}

/// Scriptable stand-in for the remote auth endpoints.
pub struct MockAuthApi {
    pub login: Mutex<Outcome>,
    pub register: Mutex<Outcome>,
    pub logout_fails: bool,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    /// When set, `login` waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl MockAuthApi {
    pub fn succeeding() -> Self {
        Self::with(Outcome::Succeed(mock_auth_response()), false)
    }

    pub fn rejecting(message: &str) -> Self {
        let err = ApiError::from_response(
            401,
            &json!({ "message": message }).to_string(),
            "Login failed",
        );
        Self::with(Outcome::Fail(err), false)
    }

    pub fn with(outcome: Outcome, logout_fails: bool) -> Self {
        Self {
            login: Mutex::new(outcome.clone()),
            register: Mutex::new(outcome),
            logout_fails,
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let outcome = self.login.lock().expect("lock").clone();
        outcome.into_result()
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.register.lock().expect("lock").clone();
        outcome.into_result()
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails {
            return Err(AppError::Api(ApiError::transport(
                "connection reset",
                "Logout failed",
            )));
        }
        Ok(())
    }
}

/// `{user, session, token: "mock-token-123"}`
#[allow(dead_code)]
pub fn mock_auth_response() -> AuthResponse {
    AuthResponse {
        user: sample_user(),
        session: json!({ "id": "session123", "expires_at": "2030-01-01T00:00:00Z" }),
        token: SessionToken::new("mock-token-123"),
    }
}

/// Controller over a mock API and the given storage.
#[allow(dead_code)]
pub fn controller(api: Arc<MockAuthApi>, kv: Arc<MemoryStore>) -> AuthSession {
    AuthSession::new(api, SessionStore::new(kv))
}
