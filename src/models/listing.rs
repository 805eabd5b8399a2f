//! Listing, feed entry and listing query models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a listing offers a card or asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    Selling,
    Looking,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Selling => "selling",
            ListingType::Looking => "looking",
        }
    }
}

/// Card condition grades accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Any,
    Mint,
    NearMint,
    Excellent,
    Good,
    LightPlayed,
    Played,
    Poor,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::Any,
        Condition::Mint,
        Condition::NearMint,
        Condition::Excellent,
        Condition::Good,
        Condition::LightPlayed,
        Condition::Played,
        Condition::Poor,
    ];

    /// Wire name (`near_mint`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Any => "any",
            Condition::Mint => "mint",
            Condition::NearMint => "near_mint",
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::LightPlayed => "light_played",
            Condition::Played => "played",
            Condition::Poor => "poor",
        }
    }

    /// Human label (`Near Mint`).
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Any => "Any",
            Condition::Mint => "Mint",
            Condition::NearMint => "Near Mint",
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::LightPlayed => "Light Played",
            Condition::Played => "Played",
            Condition::Poor => "Poor",
        }
    }

    /// Parse either a label or a wire name. Case and whitespace are folded,
    /// so "Near Mint", "near mint" and "near_mint" all match.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self::ALL.into_iter().find(|c| c.as_str() == normalized)
    }

    /// Like [`Condition::parse`], falling back to near mint for anything
    /// unrecognized.
    pub fn parse_or_default(input: &str) -> Self {
        Self::parse(input).unwrap_or(Condition::NearMint)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a listing on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Deactivated,
    Sold,
    Found,
}

/// Body of `POST /listings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub item_title: String,
    pub description: String,
    /// Decimal string as entered; the server owns the money type
    pub price: String,
    pub listing_type: ListingType,
    pub condition: Condition,
    pub category_id: String,
    pub card_set_id: String,
}

/// Listing as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub item_title: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub listing_type: ListingType,
    pub condition: Condition,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    pub user_id: u64,
    pub category_id: String,
    pub card_set_id: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Feed entry ("hit"): a listing with its author and social counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: u64,
    pub item_title: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub listing_type: ListingType,
    /// Free-form on the feed endpoint
    pub condition: String,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    pub user_id: u64,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    pub category_id: String,
    pub card_set_id: String,
    pub created_at: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Filters for `GET /listings`. Unset fields are left off the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<ListingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListingQuery {
    pub fn of_type(listing_type: ListingType) -> Self {
        Self {
            listing_type: Some(listing_type),
            ..Self::default()
        }
    }
}
