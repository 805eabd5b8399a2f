// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote API access and feed interactions.

pub mod auth;
pub mod feed;
pub mod marketplace;

pub use auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
pub use marketplace::MarketplaceClient;
