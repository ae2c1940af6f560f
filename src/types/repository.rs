//! Repository domain types
//!
//! `RepositoryRecord` mirrors one element of the `/users/{handle}/repos` REST
//! response. Records are read-only input: the catalog operations borrow them
//! and return re-ordered copies, never mutating the fetched set.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MAX_HANDLE_LENGTH: usize = 39;

// GitHub logins: alphanumerics and single hyphens, no leading/trailing hyphen.
static HANDLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$")
        .expect("Failed to compile account handle regex")
});

/// Account handle used to query the remote directory service
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, PartialOrd, Ord,
)]
pub struct AccountHandle(String);

impl AccountHandle {
    /// Parse and validate an account handle
    pub fn parse(handle: &str) -> Result<Self, String> {
        let trimmed = handle.trim();
        if trimmed.is_empty() {
            return Err("Account handle must not be empty".to_string());
        }
        if trimmed.len() > MAX_HANDLE_LENGTH || !HANDLE_REGEX.is_match(trimmed) {
            return Err(format!("Invalid account handle: {}", trimmed));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A repository as returned by the remote directory service.
///
/// Only the fields the catalog uses are decoded. Absent counts default to 0,
/// absent flags to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepositoryRecord {
    /// Human-readable identifier, unique per account
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language tag
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub html_url: String,
    /// ISO 8601 timestamp of the last update
    #[serde(default)]
    pub updated_at: String,
}

impl RepositoryRecord {
    /// Create a record with zero counts and no flags set
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            description: None,
            language: None,
            stargazers_count: 0,
            forks: 0,
            archived: false,
            fork: false,
            html_url: String::new(),
            updated_at: String::new(),
        }
    }

    /// Stars plus forks, the featured ranking score
    pub fn popularity(&self) -> u64 {
        self.stargazers_count.saturating_add(self.forks)
    }

    /// Parsed `updated_at`, or `None` when the timestamp is unparseable
    pub fn updated_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    /// Parsed `updated_at`, with unparseable timestamps mapped to the oldest instant
    pub fn updated_or_oldest(&self) -> DateTime<Utc> {
        self.updated_timestamp().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
