// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation guard: picks the screen tree for the current auth state.

use crate::session::controller::{AuthSession, AuthState, SessionStatus};
use std::fmt;
use tokio::sync::watch;

/// Navigation targets signalled by session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Register,
    Main,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/auth/signin",
            Route::Register => "/auth/register",
            Route::Main => "/main",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Which set of screens is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTree {
    /// Auth state not known yet, or an auth operation is running
    Splash,
    /// Sign-in and registration only
    Auth,
    /// The main application only
    Main,
}

/// Tree for a status snapshot.
pub fn route_tree(status: &SessionStatus) -> RouteTree {
    if status.is_loading() {
        RouteTree::Splash
    } else if status.is_authenticated() {
        RouteTree::Main
    } else {
        RouteTree::Auth
    }
}

/// Redirect for a user sitting on an auth screen: signed-in users go to the
/// main application, everyone else stays put.
pub fn redirect_for(state: &AuthState) -> Option<Route> {
    match state {
        AuthState::Authenticated(_) => Some(Route::Main),
        _ => None,
    }
}

/// Follows a controller's status and reports the tree to render.
pub struct AuthGuard {
    rx: watch::Receiver<SessionStatus>,
}

impl AuthGuard {
    pub fn new(session: &AuthSession) -> Self {
        Self {
            rx: session.subscribe(),
        }
    }

    pub fn current(&self) -> RouteTree {
        route_tree(&self.rx.borrow())
    }

    /// Wait until the startup restore has resolved. There is no timeout.
    pub async fn ready(&mut self) -> RouteTree {
        let resolved = match self
            .rx
            .wait_for(|s| s.state != AuthState::Loading)
            .await
        {
            Ok(status) => Some(route_tree(&status)),
            Err(_) => None,
        };

        // Controller dropped: report whatever was last published
        resolved.unwrap_or_else(|| self.current())
    }

    /// Wait for the next status change. `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<RouteTree> {
        self.rx.changed().await.ok()?;
        let tree = self.current();
        tracing::debug!(?tree, "Auth state changed");
        Some(tree)
    }
}
