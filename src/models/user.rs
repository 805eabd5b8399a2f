//! User record and session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile of the authenticated account, as returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-side account ID
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Public handle (older accounts may not have one)
    #[serde(default)]
    pub user_name: Option<String>,
    /// Whether the email address has been confirmed
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", skipping whichever part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Opaque bearer credential issued by the server at sign-in.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut user: User = serde_json::from_str(
            r#"{"id":1,"email":"a@b.co","first_name":"Jane","last_name":""}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Jane");

        user.first_name = String::new();
        user.last_name = "Smith".to_string();
        assert_eq!(user.display_name(), "Smith");
    }

    #[test]
    fn test_minimal_user_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"email":"t@e.com","first_name":"T","last_name":"U","user_name":null}"#,
        )
        .unwrap();
        assert!(!user.verified);
        assert!(user.user_name.is_none());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.as_str(), "super-secret");
    }
}
