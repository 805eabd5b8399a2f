//! Comments on feed entries.

use serde::{Deserialize, Serialize};

/// A comment on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub user_id: u64,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    pub comment: String,
    pub created_at: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub replies_count: Option<u32>,
}

/// Body of `POST /listings/{id}/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment<'a> {
    pub comment: &'a str,
}
