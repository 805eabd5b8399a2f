// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: persistence, the auth controller and the navigation
//! guard.

pub mod controller;
pub mod guard;
pub mod store;

pub use controller::{AuthSession, AuthState, SessionStatus};
pub use guard::{redirect_for, route_tree, AuthGuard, Route, RouteTree};
pub use store::SessionStore;
