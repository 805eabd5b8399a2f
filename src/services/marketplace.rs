// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marketplace API client.
//!
//! Handles:
//! - Registration, login (token from the `x-session-token` header), logout
//! - Categories, listings, the hits feed, likes and comments
//! - Bearer token injection from the session store
//! - Clearing the stored session when the server answers 401

use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::models::{
    Category, Comment, Hit, Listing, ListingQuery, ListingRequest, ListingType, NewComment,
    SessionToken, User,
};
use crate::services::auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
use crate::session::SessionStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Response header carrying the session token after `POST /sign_in`.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Marketplace API client.
#[derive(Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl MarketplaceClient {
    /// Create a client for `config.api_base_url` that reads and clears
    /// credentials through `store`.
    pub fn new(config: &Config, store: SessionStore) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(base_url = %config.api_base_url, "Marketplace client configured");

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    /// Fetch the authenticated user with the stored token.
    pub async fn current_user(&self) -> Result<User, AppError> {
        self.get_json("/me", "Failed to fetch user").await
    }

    /// `POST /sign_in`, then `GET /me` with the token from the response header.
    async fn login_with(&self, request: &LoginRequest, fallback: &str) -> Result<AuthResponse, AppError> {
        tracing::info!(email = %request.email, base_url = %self.base_url, "Login attempt");

        let builder = self.request(Method::POST, "/sign_in").await.json(request);
        let response = self.send(builder, fallback).await?;

        let token = response
            .headers()
            .get(SESSION_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(SessionToken::new);

        let Some(token) = token else {
            tracing::warn!(status = %response.status(), "No session token in login response headers");
            return Err(AppError::MissingSessionToken);
        };

        let session = match response.text().await {
            Ok(body) => serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
            Err(e) => {
                tracing::debug!(error = %e, "Could not read login response body");
                serde_json::Value::Null
            }
        };

        let builder = self
            .http
            .get(self.url("/me"))
            .bearer_auth(token.as_str());
        let response = self.send(builder, fallback).await?;
        let user: User = Self::parse_json(response, fallback).await?;

        tracing::info!(user_id = user.id, "Login successful");
        Ok(AuthResponse {
            user,
            session,
            token,
        })
    }

    // ─── Categories ──────────────────────────────────────────────────────────

    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        let categories: Vec<Category> = self
            .get_json("/categories", "Failed to fetch categories")
            .await?;
        tracing::debug!(count = categories.len(), "Categories fetched");
        Ok(categories)
    }

    /// Categories from the server, or the built-in set if that fails.
    pub async fn categories_or_default(&self) -> Vec<Category> {
        match self.categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default categories");
                Category::defaults()
            }
        }
    }

    // ─── Listings ────────────────────────────────────────────────────────────

    pub async fn create_listing(&self, listing: &ListingRequest) -> Result<Listing, AppError> {
        let created: Listing = self
            .send_json(Method::POST, "/listings", listing, "Failed to create listing")
            .await?;
        tracing::info!(
            listing_id = created.id,
            listing_type = created.listing_type.as_str(),
            "Listing created"
        );
        Ok(created)
    }

    /// List listings matching `query`.
    pub async fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, AppError> {
        let fallback = "Failed to fetch listings";
        let builder = self.request(Method::GET, "/listings").await.query(query);
        let response = self.send(builder, fallback).await?;
        Self::parse_json(response, fallback).await
    }

    pub async fn selling_listings(&self) -> Result<Vec<Listing>, AppError> {
        self.listings(&ListingQuery::of_type(ListingType::Selling))
            .await
    }

    pub async fn looking_listings(&self) -> Result<Vec<Listing>, AppError> {
        self.listings(&ListingQuery::of_type(ListingType::Looking))
            .await
    }

    /// The hits feed.
    pub async fn hits(&self) -> Result<Vec<Hit>, AppError> {
        self.get_json("/hits", "Failed to fetch feed").await
    }

    pub async fn like_listing(&self, listing_id: u64) -> Result<(), AppError> {
        let path = format!("/listings/{}/like", listing_id);
        let builder = self.request(Method::POST, &path).await;
        self.send(builder, "Failed to like listing").await?;
        Ok(())
    }

    pub async fn unlike_listing(&self, listing_id: u64) -> Result<(), AppError> {
        let path = format!("/listings/{}/like", listing_id);
        let builder = self.request(Method::DELETE, &path).await;
        self.send(builder, "Failed to unlike listing").await?;
        Ok(())
    }

    // ─── Comments ────────────────────────────────────────────────────────────

    pub async fn comments(&self, listing_id: u64) -> Result<Vec<Comment>, AppError> {
        let path = format!("/listings/{}/comments", listing_id);
        self.get_json(&path, "Failed to fetch comments").await
    }

    pub async fn post_comment(&self, listing_id: u64, text: &str) -> Result<Comment, AppError> {
        let path = format!("/listings/{}/comments", listing_id);
        self.send_json(
            Method::POST,
            &path,
            &NewComment { comment: text },
            "Failed to post comment",
        )
        .await
    }

    pub async fn like_comment(&self, comment_id: u64) -> Result<(), AppError> {
        let path = format!("/comments/{}/like", comment_id);
        let builder = self.request(Method::POST, &path).await;
        self.send(builder, "Failed to like comment").await?;
        Ok(())
    }

    // ─── Plumbing ────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, attaching the stored token if there is one.
    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.store.get_token().await {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, AppError> {
        let builder = self.request(Method::GET, path).await;
        let response = self.send(builder, fallback).await?;
        Self::parse_json(response, fallback).await
    }

    /// Request with a JSON body and JSON response.
    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, AppError> {
        let builder = self.request(method, path).await.json(body);
        let response = self.send(builder, fallback).await?;
        Self::parse_json(response, fallback).await
    }

    /// Send and check the status.
    async fn send(&self, builder: RequestBuilder, fallback: &str) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed before a response");
            ApiError::transport(e, fallback)
        })?;

        self.check_response(response, fallback).await
    }

    /// Check response status and return a normalized error if not successful.
    async fn check_response(&self, response: Response, fallback: &str) -> Result<Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Token expired or invalid: forget it. In-memory session state is
        // left to the caller.
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Authentication rejected (401), clearing stored session");
            self.store.clear_all().await;
        }

        let err = ApiError::from_response(status.as_u16(), &body, fallback);
        tracing::debug!(status = %status, message = %err.message, "API request failed");
        Err(err.into())
    }

    /// Parse a successful response body.
    async fn parse_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, AppError> {
        let status = response.status().as_u16();
        response.json().await.map_err(|e| {
            AppError::Api(ApiError {
                status: Some(status),
                message: format!("{}: invalid response ({})", fallback, e),
                errors: serde_json::Map::new(),
            })
        })
    }
}

#[async_trait]
impl AuthApi for MarketplaceClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.login_with(request, "Login failed").await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        let fallback = "Registration failed";

        let builder = self.request(Method::POST, "/sign_up").await.json(request);
        self.send(builder, fallback).await?;
        tracing::info!(email = %request.email, "Registration accepted, signing in");

        // The account exists from here on even if the login below fails.
        let login = LoginRequest {
            email: request.email.clone(),
            password: request.password.clone(),
        };
        self.login_with(&login, fallback).await.inspect_err(|e| {
            tracing::warn!(
                error = %e,
                email = %request.email,
                "Account created but sign-in after registration failed"
            );
        })
    }

    async fn logout(&self) -> Result<(), AppError> {
        let builder = self.request(Method::DELETE, "/sign_out").await;
        self.send(builder, "Logout failed").await?;
        Ok(())
    }
}
