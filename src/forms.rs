// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side form validation.
//!
//! Checks run in a fixed order and only the first failure is reported, with
//! the message shown to the user.

use crate::error::AppError;
use crate::models::{Condition, ListingRequest, ListingType};
use crate::services::auth::RegisterRequest;
use regex::Regex;
use std::sync::LazyLock;
use validator::{Validate, ValidationErrors};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username regex"));

#[derive(Debug, Clone, Default, Validate)]
pub struct SignInForm {
    #[validate(regex(path = *EMAIL_RE, message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn check(&self) -> Result<(), AppError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation("Please fill in all fields".to_string()));
        }
        self.validate().map_err(|e| first_error(&e, &["email"]))
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    #[validate(regex(path = *EMAIL_RE, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 12, message = "Password must be at least 12 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters long"),
        regex(
            path = *USERNAME_RE,
            message = "Username can only contain letters, numbers, and underscores"
        )
    )]
    pub user_name: String,
}

impl RegistrationForm {
    pub fn check(&self) -> Result<(), AppError> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.user_name,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(AppError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }

        self.validate()
            .map_err(|e| first_error(&e, &["email", "password", "user_name", "confirm_password"]))
    }

    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            email: self.email,
            password: self.password,
            password_confirmation: self.confirm_password,
            first_name: self.first_name,
            last_name: self.last_name,
            user_name: Some(self.user_name).filter(|u| !u.is_empty()),
        }
    }
}

/// Input for a new listing as typed by the user.
#[derive(Debug, Clone)]
pub struct ListingForm {
    pub item_title: String,
    pub description: String,
    pub price: String,
    pub listing_type: ListingType,
    /// Label ("Near Mint") or wire name
    pub condition: String,
    pub category_id: String,
    pub card_set_id: String,
}

impl ListingForm {
    pub fn check(&self) -> Result<(), AppError> {
        if self.item_title.trim().is_empty() {
            let message = match self.listing_type {
                ListingType::Selling => "Please enter a title for your listing.",
                ListingType::Looking => "Please enter what you are looking for.",
            };
            return Err(AppError::Validation(message.to_string()));
        }

        if self.listing_type == ListingType::Selling {
            let valid = self
                .price
                .trim()
                .parse::<f64>()
                .map(|p| p.is_finite() && p > 0.0)
                .unwrap_or(false);
            if !valid {
                return Err(AppError::Validation(
                    "Please enter a valid price greater than 0.".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn into_request(self) -> ListingRequest {
        ListingRequest {
            item_title: self.item_title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            listing_type: self.listing_type,
            condition: Condition::parse_or_default(&self.condition),
            category_id: self.category_id,
            card_set_id: self.card_set_id,
        }
    }
}

/// Message for a failed registration: the first server-side field error in
/// display order, otherwise the error's own message.
pub fn registration_failure_message(err: &AppError) -> String {
    if let AppError::Api(api) = err {
        let labelled = [
            ("email", "Email"),
            ("password", "Password"),
            ("first_name", "First name"),
            ("last_name", "Last name"),
        ];
        for (field, label) in labelled {
            if let Some(msg) = api.first_field_error(field) {
                return format!("{} {}", label, msg);
            }
        }
    }

    let message = err.message();
    if message.is_empty() {
        "Registration failed. Please try again.".to_string()
    } else {
        message
    }
}

/// Convert validator output to the first failure in `order`.
fn first_error(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let field_errors = errors.field_errors();
    let message = order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .filter_map(|errs| errs.first())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string());
    AppError::Validation(message)
}
