pub mod card;
pub mod html;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use card::*;
pub use html::*;

use crate::types::RepositoryRecord;

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MarkdownContent(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HtmlContent(pub String);

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Human-friendly age of a repository's last update relative to `now`.
///
/// Day counts round up: "Yesterday" for one day, "N days ago" below a week,
/// "N weeks ago" below thirty days, and the calendar date beyond that.
/// Returns `None` when `updated_at` cannot be parsed.
pub fn relative_updated_label(record: &RepositoryRecord, now: DateTime<Utc>) -> Option<String> {
    let updated_at = record.updated_timestamp()?;
    let diff_millis = (now - updated_at).num_milliseconds().abs();
    let diff_days = (diff_millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;

    let label = match diff_days {
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", (d + 6) / 7),
        _ => updated_at.format("%Y-%m-%d").to_string(),
    };
    Some(label)
}
