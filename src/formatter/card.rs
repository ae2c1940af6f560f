use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::formatter::MarkdownContent;
use crate::types::RepositoryRecord;

/// Placeholder shown when a repository has no description
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "No description provided.";

/// Presentation-ready summary of one repository.
///
/// Optional parts are `None` when the presentation layer should omit them:
/// no language tag, or a zero star/fork count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CardDescriptor {
    pub title: String,
    /// Repository description, or the placeholder text
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Formatted star count, e.g. `★ 12`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<String>,
    /// Formatted fork count, e.g. `⑂ 3`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<String>,
    /// Outbound link to the repository page
    pub url: String,
}

impl From<&RepositoryRecord> for CardDescriptor {
    fn from(record: &RepositoryRecord) -> Self {
        let description = record
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .unwrap_or(NO_DESCRIPTION_PLACEHOLDER)
            .to_string();

        let language = record
            .language
            .as_ref()
            .filter(|language| !language.is_empty())
            .cloned();

        Self {
            title: record.name.clone(),
            description,
            language,
            stars: (record.stargazers_count > 0).then(|| format!("★ {}", record.stargazers_count)),
            forks: (record.forks > 0).then(|| format!("⑂ {}", record.forks)),
            url: record.html_url.clone(),
        }
    }
}

/// Maps records to display cards, preserving order
pub fn render(records: &[RepositoryRecord]) -> Vec<CardDescriptor> {
    records.iter().map(CardDescriptor::from).collect()
}

pub fn card_markdown(card: &CardDescriptor, updated_label: Option<&str>) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("## {}\n", card.title));
    content.push_str(&format!("{}\n\n", card.description));

    let meta: Vec<&str> = [
        card.language.as_deref(),
        card.stars.as_deref(),
        card.forks.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !meta.is_empty() {
        content.push_str(&format!("{}\n", meta.join(" · ")));
    }

    if let Some(updated_label) = updated_label {
        content.push_str(&format!("Updated: {}\n", updated_label));
    }

    content.push_str(&format!("[View on GitHub]({})\n", card.url));

    MarkdownContent(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_record() {
        let record = RepositoryRecord {
            description: Some("Fast things".to_string()),
            language: Some("Rust".to_string()),
            stargazers_count: 12,
            forks: 3,
            html_url: "https://github.com/octo/fast".to_string(),
            ..RepositoryRecord::new("fast")
        };

        let cards = render(&[record]);
        assert_eq!(
            cards,
            vec![CardDescriptor {
                title: "fast".to_string(),
                description: "Fast things".to_string(),
                language: Some("Rust".to_string()),
                stars: Some("★ 12".to_string()),
                forks: Some("⑂ 3".to_string()),
                url: "https://github.com/octo/fast".to_string(),
            }]
        );
    }

    #[test]
    fn test_render_omits_empty_parts() {
        let card = CardDescriptor::from(&RepositoryRecord::new("bare"));

        assert_eq!(card.description, NO_DESCRIPTION_PLACEHOLDER);
        assert_eq!(card.language, None);
        assert_eq!(card.stars, None);
        assert_eq!(card.forks, None);

        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("stars").is_none());
        assert!(json.get("language").is_none());
    }

    #[test]
    fn test_render_preserves_order() {
        let records = vec![RepositoryRecord::new("b"), RepositoryRecord::new("a")];
        let titles: Vec<String> = render(&records).into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn test_card_markdown() {
        let card = CardDescriptor {
            title: "tool".to_string(),
            description: "Does work".to_string(),
            language: Some("Go".to_string()),
            stars: Some("★ 2".to_string()),
            forks: None,
            url: "https://github.com/octo/tool".to_string(),
        };

        let markdown = card_markdown(&card, Some("3 days ago")).0;
        assert!(markdown.starts_with("## tool\nDoes work\n"));
        assert!(markdown.contains("Go · ★ 2\n"));
        assert!(markdown.contains("Updated: 3 days ago\n"));
        assert!(markdown.ends_with("[View on GitHub](https://github.com/octo/tool)\n"));
    }
}
