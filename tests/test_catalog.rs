//! End-to-end tests of the catalog pipeline: fetch, select, filter, render
//!
//! A mocked listing feeds the public catalog functions the same way the CLI
//! does, so these tests cover the whole path from response body to cards.

use serde_json::json;

use github_showcase::formatter::{CardDescriptor, NO_DESCRIPTION_PLACEHOLDER, render};
use github_showcase::services::{
    CatalogSession, apply_filter_and_sort, available_languages, locale_compare, select_featured,
};
use github_showcase::types::{AccountHandle, FilterCriteria, RepositoryRecord, SortMode};
use test_util::{create_test_github_client, repository_json, sample_response};

async fn fetch_sample_catalog() -> Vec<RepositoryRecord> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/octocat/repos")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(sample_response().to_string())
        .create_async()
        .await;

    let client = create_test_github_client(&server.url());
    let handle = AccountHandle::parse("octocat").unwrap();
    client.fetch_all(&handle).await.unwrap()
}

fn names(records: &[RepositoryRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_featured_pipeline_default_ranking() {
    let all = fetch_sample_catalog().await;

    // Only forks are excluded from the default ranking
    let featured = select_featured(&all, None);
    assert_eq!(names(&featured), vec!["legacy", "Atlas", "showcase", "notes"]);

    let cards = render(&featured);
    assert_eq!(
        cards[0],
        CardDescriptor {
            title: "legacy".to_string(),
            description: "The legacy project".to_string(),
            language: Some("Rust".to_string()),
            stars: Some("★ 40".to_string()),
            forks: Some("⑂ 9".to_string()),
            url: "https://github.com/octocat/legacy".to_string(),
        }
    );

    let notes = &cards[3];
    assert_eq!(notes.language, None);
    assert_eq!(notes.stars, None);
    assert_eq!(notes.forks, None);
}

#[tokio::test]
async fn test_featured_pipeline_explicit_names() {
    let all = fetch_sample_catalog().await;

    let explicit = vec![
        "NOTES".to_string(),
        "missing".to_string(),
        "linux".to_string(),
    ];
    let featured = select_featured(&all, Some(explicit.as_slice()));

    // Forks are allowed when named explicitly
    assert_eq!(names(&featured), vec!["notes", "linux"]);

    let empty: Vec<String> = Vec::new();
    assert_eq!(
        select_featured(&all, Some(empty.as_slice())),
        select_featured(&all, None)
    );
}

#[tokio::test]
async fn test_list_pipeline_sort_modes() {
    let all = fetch_sample_catalog().await;

    let by_updated = apply_filter_and_sort(&all, &FilterCriteria::sorted_by(SortMode::Updated));
    assert_eq!(names(&by_updated), vec!["showcase", "linux", "Atlas", "notes"]);

    let by_stars = apply_filter_and_sort(&all, &FilterCriteria::sorted_by(SortMode::Stars));
    assert_eq!(names(&by_stars), vec!["Atlas", "showcase", "linux", "notes"]);

    let by_name = apply_filter_and_sort(&all, &FilterCriteria::sorted_by(SortMode::Name));
    assert_eq!(names(&by_name), vec!["Atlas", "linux", "notes", "showcase"]);
    for pair in by_name.windows(2) {
        assert_ne!(
            locale_compare(&pair[0].name, &pair[1].name),
            std::cmp::Ordering::Greater
        );
    }
}

#[tokio::test]
async fn test_list_pipeline_without_constraints_is_idempotent() {
    let all = fetch_sample_catalog().await;

    for sort_mode in [SortMode::Updated, SortMode::Stars, SortMode::Name] {
        let criteria = FilterCriteria::new("", Some(String::new()), sort_mode);
        let once = apply_filter_and_sort(&all, &criteria);
        let twice = apply_filter_and_sort(&once, &criteria);

        assert_eq!(once.len(), all.iter().filter(|r| !r.archived).count());
        assert_eq!(once, twice);
    }
}

#[tokio::test]
async fn test_archived_match_is_always_excluded() {
    let all = fetch_sample_catalog().await;

    // "legacy" is archived, Rust, and matches the search text exactly
    let criteria = FilterCriteria::new("legacy", Some("Rust".to_string()), SortMode::Stars);
    assert!(apply_filter_and_sort(&all, &criteria).is_empty());

    let criteria = FilterCriteria::new("", Some("Rust".to_string()), SortMode::Updated);
    assert_eq!(names(&apply_filter_and_sort(&all, &criteria)), vec!["showcase"]);
}

#[test]
fn test_language_filter_is_case_sensitive() {
    let all: Vec<RepositoryRecord> = serde_json::from_value(json!([
        repository_json("upper", 1, 0, false, false, Some("Go"), "2024-01-01T00:00:00Z"),
        repository_json("absent", 1, 0, false, false, None, "2024-01-02T00:00:00Z"),
        repository_json("lower", 1, 0, false, false, Some("go"), "2024-01-03T00:00:00Z"),
    ]))
    .unwrap();

    let criteria = FilterCriteria::new("", Some("Go".to_string()), SortMode::Updated);
    assert_eq!(names(&apply_filter_and_sort(&all, &criteria)), vec!["upper"]);
}

#[test]
fn test_search_matches_description_and_placeholder_for_missing() {
    let all: Vec<RepositoryRecord> = serde_json::from_value(json!([
        { "name": "alpha", "description": "A Parser for configs" },
        { "name": "beta", "description": null },
        { "name": "gamma", "description": "" },
    ]))
    .unwrap();

    let criteria = FilterCriteria::new("parser", None, SortMode::Name);
    assert_eq!(names(&apply_filter_and_sort(&all, &criteria)), vec!["alpha"]);

    let cards = render(&all);
    assert_eq!(cards[1].description, NO_DESCRIPTION_PLACEHOLDER);
    assert_eq!(cards[2].description, NO_DESCRIPTION_PLACEHOLDER);
}

#[tokio::test]
async fn test_session_languages_and_view() {
    let all = fetch_sample_catalog().await;
    assert_eq!(available_languages(&all), vec!["C", "Go", "Rust"]);

    let mut session = CatalogSession::new(all);
    session.set_search_text("ATL");
    assert_eq!(names(&session.view()), vec!["Atlas"]);

    session.set_search_text("");
    session.set_language_filter(Some("C".to_string()));
    assert_eq!(names(&session.view()), vec!["linux"]);
    assert_eq!(session.languages(), vec!["C", "Go", "Rust"]);
}
