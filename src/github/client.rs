use crate::github::error::FetchError;
use crate::types::{AccountHandle, RepositoryRecord};

use anyhow::{Context, Result};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::Serialize;
use tokio::time::Duration;
use tracing::{info, warn};

/// Public GitHub REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Largest page the listing endpoint serves; only the first page is ever requested
pub const MAX_REPOSITORIES_PER_PAGE: u8 = 100;

#[derive(Debug, Serialize)]
struct ListRepositoriesParams {
    per_page: u8,
    sort: &'static str,
}

#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) client: octocrab::Octocrab,
}

impl GitHubClient {
    /// Creates a client for the public GitHub API.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, timeout)
    }

    /// Creates a client against an arbitrary API root, e.g. a GitHub Enterprise host
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // A failed listing is terminal; octocrab must not retry on its own
        let mut builder = Octocrab::builder()
            .base_uri(base_url)
            .context(format!("Invalid GitHub API base URL: {}", base_url))?
            .add_retry_config(RetryConfig::None);

        if let Some(timeout_duration) = timeout {
            let timeout_duration = std::cmp::max(timeout_duration, Duration::from_secs(1));
            builder = builder
                .set_connect_timeout(Some(timeout_duration))
                .set_read_timeout(Some(timeout_duration))
                .set_write_timeout(Some(timeout_duration));
        }

        let client = builder.build().context("Failed to build GitHub client")?;

        Ok(Self { client })
    }

    /// Fetches the account's repositories, most recently updated first.
    ///
    /// Only a single page of up to 100 records is requested; accounts with more
    /// repositories are truncated to their 100 most recently updated. The
    /// returned records keep the exact order of the response body.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the service answers with a non-success
    /// status, the transport fails, or the body is not a repository array.
    /// Failures are not retried.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use github_showcase::github::GitHubClient;
    /// use github_showcase::types::AccountHandle;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GitHubClient::new(None)?;
    /// let handle = AccountHandle::parse("octocat").map_err(anyhow::Error::msg)?;
    ///
    /// let repositories = client.fetch_all(&handle).await?;
    /// for repository in &repositories {
    ///     println!("{} ★{}", repository.name, repository.stargazers_count);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_all(
        &self,
        handle: &AccountHandle,
    ) -> Result<Vec<RepositoryRecord>, FetchError> {
        let route = format!("/users/{}/repos", urlencoding::encode(handle.as_str()));
        let params = ListRepositoriesParams {
            per_page: MAX_REPOSITORIES_PER_PAGE,
            sort: "updated",
        };

        info!("Starting repository listing for {}", handle);
        let start_time = std::time::Instant::now();

        let repositories: Vec<RepositoryRecord> = self
            .client
            .get(route, Some(&params))
            .await
            .map_err(|e| {
                warn!(
                    "Repository listing for {} failed after {:?}",
                    handle,
                    start_time.elapsed()
                );
                FetchError::from_octocrab_error(e)
            })?;

        info!(
            "Repository listing for {} completed in {:?}, fetched {} repositories",
            handle,
            start_time.elapsed(),
            repositories.len()
        );

        Ok(repositories)
    }
}
