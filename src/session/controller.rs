// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth session controller.
//!
//! Owns the in-memory authentication state and drives it through
//! restore, sign-in, sign-up and sign-out. State changes are published on a
//! watch channel so a guard can re-select the navigation tree.

use crate::error::AppError;
use crate::forms::RegistrationForm;
use crate::models::User;
use crate::services::auth::{AuthApi, AuthResponse, LoginRequest};
use crate::session::guard::Route;
use crate::session::SessionStore;
use std::sync::Arc;
use tokio::sync::watch;

/// Authentication state derived from storage and remote calls.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Unauthenticated,
}

/// Published snapshot: the state plus whether an operation is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub state: AuthState,
    pub busy: bool,
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        self.busy || self.state == AuthState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Session controller shared by everything that needs the current user.
pub struct AuthSession {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    status: watch::Sender<SessionStatus>,
}

impl AuthSession {
    /// New controller in the `Loading` state. Call [`AuthSession::restore`]
    /// once at startup.
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore) -> Self {
        let (status, _) = watch::channel(SessionStatus {
            state: AuthState::Loading,
            busy: false,
        });
        Self { api, store, status }
    }

    /// Receiver for status changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> AuthState {
        self.status.borrow().state.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.status.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status.borrow().is_authenticated()
    }

    /// Rebuild the in-memory state from storage.
    ///
    /// Both token and user must be present. A read failure clears storage.
    pub async fn restore(&self) -> AuthState {
        tracing::debug!("Checking stored auth state");

        let state = match self.read_stored().await {
            Ok(Some(user)) => {
                tracing::info!(user_id = user.id, "Restored user session");
                AuthState::Authenticated(user)
            }
            Ok(None) => {
                tracing::info!("No stored auth data found");
                AuthState::Unauthenticated
            }
            Err(e) => {
                tracing::error!(error = %e, "Error checking auth state, clearing stored data");
                self.store.clear_all().await;
                AuthState::Unauthenticated
            }
        };

        self.set_state(state.clone());
        state
    }

    async fn read_stored(&self) -> Result<Option<User>, AppError> {
        let token = self.store.try_token().await?;
        let user = self.store.try_user().await?;

        match (token, user) {
            (Some(_), Some(user)) => Ok(Some(user)),
            (token, user) => {
                if token.is_some() != user.is_some() {
                    tracing::warn!(
                        has_token = token.is_some(),
                        has_user = user.is_some(),
                        "Incomplete stored session, treating as signed out"
                    );
                }
                Ok(None)
            }
        }
    }

    /// Log in and persist the session.
    ///
    /// On success returns the route to navigate to. On failure nothing is
    /// stored, the state is unchanged, and the error is returned as-is.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Route, AppError> {
        tracing::info!("Starting sign in");
        let _busy = self.busy();

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.api.login(&request).await;
        self.complete(result, "Sign in").await
    }

    /// Register and log in, persisting the session.
    pub async fn sign_up(&self, form: RegistrationForm) -> Result<Route, AppError> {
        tracing::info!("Starting sign up");
        let _busy = self.busy();

        let request = form.into_request();
        let result = self.api.register(&request).await;
        self.complete(result, "Sign up").await
    }

    async fn complete(
        &self,
        result: Result<AuthResponse, AppError>,
        operation: &'static str,
    ) -> Result<Route, AppError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, operation, "Authentication failed");
                return Err(e);
            }
        };

        self.store.set_token(&response.token).await;
        self.store.set_user(&response.user).await;

        tracing::info!(user_id = response.user.id, operation, "User is now authenticated");
        self.set_state(AuthState::Authenticated(response.user));
        Ok(Route::Main)
    }

    /// Log out. The remote call is best-effort; local state is always
    /// cleared.
    pub async fn sign_out(&self) -> Route {
        tracing::info!("Starting sign out");
        let _busy = self.busy();

        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Logout API error, clearing local session anyway");
        }

        self.store.clear_all().await;
        self.set_state(AuthState::Unauthenticated);

        tracing::info!("User signed out");
        Route::SignIn
    }

    fn set_state(&self, state: AuthState) {
        self.status.send_modify(|s| s.state = state);
    }

    /// Mark an operation in flight until the returned guard is dropped,
    /// including when the operation's future is dropped early.
    fn busy(&self) -> BusyGuard<'_> {
        set_busy(&self.status, true);
        BusyGuard {
            status: &self.status,
        }
    }
}

struct BusyGuard<'a> {
    status: &'a watch::Sender<SessionStatus>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        set_busy(self.status, false);
    }
}

fn set_busy(status: &watch::Sender<SessionStatus>, busy: bool) {
    status.send_if_modified(|s| {
        let changed = s.busy != busy;
        s.busy = busy;
        changed
    });
}
