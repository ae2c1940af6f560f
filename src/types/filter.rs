use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ordering applied to the filtered repository view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortMode {
    /// Most recently updated first
    #[default]
    Updated,
    /// Most starred first
    Stars,
    /// Ascending by name, locale-aware
    Name,
}

/// User-supplied filter criteria, re-derived on every filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name and description; empty matches all
    #[serde(default)]
    pub search_text: String,
    /// Exact, case-sensitive language constraint; `None` or empty is unconstrained
    #[serde(default)]
    pub language_filter: Option<String>,
    #[serde(default)]
    pub sort_mode: SortMode,
}

impl FilterCriteria {
    pub fn new<T: Into<String>>(
        search_text: T,
        language_filter: Option<String>,
        sort_mode: SortMode,
    ) -> Self {
        Self {
            search_text: search_text.into(),
            language_filter,
            sort_mode,
        }
    }

    /// Criteria that only sort, leaving everything but archived records in view
    pub fn sorted_by(sort_mode: SortMode) -> Self {
        Self {
            sort_mode,
            ..Self::default()
        }
    }

    /// The language constraint, treating an empty string as unconstrained
    pub fn language(&self) -> Option<&str> {
        self.language_filter
            .as_deref()
            .filter(|language| !language.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_sort_mode_parsing() {
        assert_eq!(SortMode::from_str("stars").unwrap(), SortMode::Stars);
        assert_eq!(SortMode::from_str("Name").unwrap(), SortMode::Name);
        assert_eq!(SortMode::from_str("updated").unwrap(), SortMode::Updated);
        assert!(SortMode::from_str("size").is_err());
        assert_eq!(SortMode::default(), SortMode::Updated);
        assert_eq!(SortMode::Stars.to_string(), "stars");
    }

    #[test]
    fn test_empty_language_is_unconstrained() {
        let criteria = FilterCriteria::new("", Some(String::new()), SortMode::Name);
        assert_eq!(criteria.language(), None);

        let criteria = FilterCriteria::new("", Some("Go".to_string()), SortMode::Name);
        assert_eq!(criteria.language(), Some("Go"));
    }
}
