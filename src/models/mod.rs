// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models shared by the session layer and the API client.

pub mod category;
pub mod comment;
pub mod listing;
pub mod user;

pub use category::Category;
pub use comment::{Comment, NewComment};
pub use listing::{
    Condition, Hit, Listing, ListingQuery, ListingRequest, ListingStatus, ListingType,
};
pub use user::{SessionToken, User};
