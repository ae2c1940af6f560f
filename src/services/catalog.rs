//! Featured selection and filtered views over a fetched repository catalog
//!
//! Every function here borrows the unfiltered catalog and returns a freshly
//! derived vector. Nothing is mutated, so a view can be recomputed on every
//! keystroke of a live search.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::types::{FilterCriteria, RepositoryRecord, SortMode};

/// Number of repositories kept by the default featured ranking
pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Selects the repositories shown prominently on the landing view.
///
/// With a non-empty `explicit_names`, each name is looked up case-insensitively
/// and the output follows the order of `explicit_names`. Unknown names are
/// dropped and no length cap is applied. Otherwise non-fork repositories are
/// ranked by stars plus forks (stable on ties) and the first six are returned.
pub fn select_featured(
    all: &[RepositoryRecord],
    explicit_names: Option<&[String]>,
) -> Vec<RepositoryRecord> {
    match explicit_names {
        Some(names) if !names.is_empty() => select_by_names(all, names),
        _ => rank_by_popularity(all),
    }
}

fn select_by_names(all: &[RepositoryRecord], names: &[String]) -> Vec<RepositoryRecord> {
    // Later duplicates win, matching a map built front to back
    let by_name: HashMap<String, &RepositoryRecord> = all
        .iter()
        .map(|record| (record.name.to_lowercase(), record))
        .collect();

    names
        .iter()
        .filter_map(|name| by_name.get(&name.to_lowercase()))
        .map(|record| (*record).clone())
        .collect()
}

fn rank_by_popularity(all: &[RepositoryRecord]) -> Vec<RepositoryRecord> {
    let mut ranked: Vec<&RepositoryRecord> = all.iter().filter(|record| !record.fork).collect();
    ranked.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
    ranked
        .into_iter()
        .take(DEFAULT_FEATURED_LIMIT)
        .cloned()
        .collect()
}

/// Derives the filtered, sorted view of the catalog.
///
/// Archived repositories are always excluded. `search_text` matches name or
/// description case-insensitively, the language filter is an exact,
/// case-sensitive match. Sorting is stable.
pub fn apply_filter_and_sort(
    all: &[RepositoryRecord],
    criteria: &FilterCriteria,
) -> Vec<RepositoryRecord> {
    let search = criteria.search_text.to_lowercase();
    let language = criteria.language();

    let mut view: Vec<RepositoryRecord> = all
        .iter()
        .filter(|record| !record.archived)
        .filter(|record| matches_search(record, &search))
        .filter(|record| matches_language(record, language))
        .cloned()
        .collect();

    match criteria.sort_mode {
        SortMode::Stars => view.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
        SortMode::Name => view.sort_by(|a, b| locale_compare(&a.name, &b.name)),
        SortMode::Updated => {
            view.sort_by_key(|record| std::cmp::Reverse(record.updated_or_oldest()))
        }
    }

    view
}

fn matches_search(record: &RepositoryRecord, lowercase_search: &str) -> bool {
    if lowercase_search.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(lowercase_search)
        || record
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(lowercase_search))
}

fn matches_language(record: &RepositoryRecord, language: Option<&str>) -> bool {
    match language {
        None => true,
        Some(language) => record.language.as_deref() == Some(language),
    }
}

/// Distinct primary languages in the catalog, sorted ascending.
///
/// Used to populate a language picker; archived repositories contribute too.
pub fn available_languages(all: &[RepositoryRecord]) -> Vec<String> {
    all.iter()
        .filter_map(|record| record.language.as_deref())
        .filter(|language| !language.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Collation approximating a root-locale string comparison.
///
/// Primary: whitespace and punctuation before symbols before digits before
/// letters. Punctuation and symbols follow the root collation order, letters
/// compare case-insensitively. Tie-break: lowercase before uppercase, then
/// plain code point order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a.chars().map(primary_key).cmp(b.chars().map(primary_key));
    if primary != Ordering::Equal {
        return primary;
    }

    let tertiary = a.chars().map(case_key).cmp(b.chars().map(case_key));
    tertiary.then_with(|| a.cmp(b))
}

/// Punctuation and symbols in root collation order
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn primary_key(c: char) -> (u8, u32) {
    if c.is_alphabetic() {
        return (3, c.to_lowercase().next().unwrap_or(c) as u32);
    }
    if c.is_numeric() {
        return (2, c as u32);
    }
    if c.is_whitespace() {
        return (0, c as u32);
    }
    match SYMBOL_ORDER.chars().position(|symbol| symbol == c) {
        Some(rank) => (1, rank as u32),
        // Unlisted symbols sort after the listed ones
        None => (1, SYMBOL_ORDER.len() as u32 + c as u32),
    }
}

fn case_key(c: char) -> u8 {
    if c.is_uppercase() { 1 } else { 0 }
}
