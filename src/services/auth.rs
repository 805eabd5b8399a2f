// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote authentication contract and its wire types.

use crate::error::AppError;
use crate::models::{SessionToken, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /sign_in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /sign_up`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Outcome of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: User,
    /// Session object from the `POST /sign_in` body, kept as sent
    pub session: serde_json::Value,
    pub token: SessionToken,
}

/// Remote operations the session controller depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError>;

    /// Register, then log in with the same credentials.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError>;

    /// Invalidate the current session server-side.
    async fn logout(&self) -> Result<(), AppError>;
}
