//! Card game categories.

use serde::{Deserialize, Serialize};

/// Top-level game category (Pokemon, Magic, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Category {
    /// Categories shown when the category endpoint is unreachable.
    pub fn defaults() -> Vec<Category> {
        [
            ("pokemon", "Pokemon"),
            ("yugioh", "Yu-Gi-Oh!"),
            ("magic", "Magic: The Gathering"),
        ]
        .into_iter()
        .map(|(id, name)| Category {
            id: id.to_string(),
            name: name.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        })
        .collect()
    }
}
