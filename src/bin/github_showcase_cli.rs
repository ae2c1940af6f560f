use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use github_showcase::formatter::{
    CardDescriptor, card_markdown, cards_html, placeholder_html, relative_updated_label, render,
};
use github_showcase::github::GitHubClient;
use github_showcase::services::{
    CatalogSession, SettingsStore, ShowcaseSettings, apply_filter_and_sort, available_languages,
    select_featured,
};
use github_showcase::types::{FilterCriteria, RepositoryRecord, SortMode};

const FEATURED_LOAD_FAILED: &str = "Unable to load featured repositories right now.";
const ALL_LOAD_FAILED: &str = "Failed to load repositories.";
const NO_MATCHES: &str = "No repositories match the current filters.";
const NO_FEATURED: &str = "No featured repositories to show.";

#[derive(Parser)]
#[command(name = "github-showcase")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Render a GitHub account's public repositories as portfolio cards, with featured selection, search, language filter and sorting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output format for cards - markdown for terminals, json for programmatic use, html for page fragments
    #[arg(long, global = true, default_value = "markdown")]
    format: OutputFormat,
    /// GitHub account whose repositories are shown (overrides the settings file and GITHUB_SHOWCASE_USERNAME)
    #[arg(long, global = true)]
    username: Option<String>,
    /// GitHub API root, e.g. for GitHub Enterprise (default: https://api.github.com)
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Request timeout in seconds; requests are unbounded when neither this nor the settings file sets one
    #[arg(long, global = true)]
    request_timeout: Option<u64>,
    /// Path to the settings file (default: ~/.config/github-showcase/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Html,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortModeCli {
    Updated,
    Stars,
    Name,
}

impl From<SortModeCli> for SortMode {
    fn from(cli_sort: SortModeCli) -> Self {
        match cli_sort {
            SortModeCli::Updated => SortMode::Updated,
            SortModeCli::Stars => SortMode::Stars,
            SortModeCli::Name => SortMode::Name,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the featured repositories - the explicit list from settings/--name, or the six most popular non-fork repositories
    Featured {
        /// Repository name to feature, in display order (repeatable; overrides the settings file)
        #[arg(short, long = "name")]
        names: Vec<String>,
    },
    /// Show all non-archived repositories, filtered and sorted
    List {
        /// Case-insensitive text matched against repository names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,
        /// Exact, case-sensitive primary language (e.g. "Rust")
        #[arg(short, long)]
        language: Option<String>,
        /// Sort order (default: updated)
        #[arg(long, default_value = "updated")]
        sort: SortModeCli,
    },
    /// List the distinct primary languages of the account's repositories
    Languages,
    /// Interactively refine the repository list from stdin (type `help` for commands)
    Browse,
    /// Write a default settings file
    InitSettings {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON schema of the card output
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider early to prevent "no process-level CryptoProvider available" panics
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("github_showcase=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.settings {
        Some(path) => SettingsStore::new(path.clone()),
        None => SettingsStore::at_default_location()
            .map_err(|e| anyhow::anyhow!("Failed to locate settings: {}", e))?,
    };

    match cli.command {
        Commands::InitSettings { force } => {
            store
                .init(force)
                .map_err(|e| anyhow::anyhow!("Failed to write settings: {}", e))?;
            println!("Wrote default settings to {}", store.path().display());
            return Ok(());
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(Vec<CardDescriptor>);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(&store, &cli)?;

    match cli.command {
        Commands::Featured { names } => {
            handle_featured_command(&settings, names, cli.format).await?;
        }
        Commands::List {
            search,
            language,
            sort,
        } => {
            let criteria = FilterCriteria::new(search, language, sort.into());
            handle_list_command(&settings, criteria, cli.format).await?;
        }
        Commands::Languages => {
            handle_languages_command(&settings, cli.format).await?;
        }
        Commands::Browse => {
            handle_browse_command(&settings, cli.format).await?;
        }
        Commands::InitSettings { .. } | Commands::Schema => {}
    }

    Ok(())
}

/// Layer settings file, environment, and command-line flags
fn load_settings(store: &SettingsStore, cli: &Cli) -> Result<ShowcaseSettings> {
    let mut settings = store
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?
        .with_env_overrides();

    if let Some(username) = &cli.username {
        settings.username = Some(username.clone());
    }
    if let Some(api_base_url) = &cli.api_base_url {
        settings.api_base_url = api_base_url.clone();
    }
    if let Some(request_timeout) = cli.request_timeout {
        settings.request_timeout_secs = Some(request_timeout);
    }

    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

/// Fetch the catalog, printing `failure_message` in the chosen format on failure
async fn fetch_catalog(
    settings: &ShowcaseSettings,
    format: OutputFormat,
    failure_message: &str,
) -> Result<Vec<RepositoryRecord>> {
    let handle = settings
        .account_handle()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let client = GitHubClient::with_base_url(&settings.api_base_url, settings.request_timeout())
        .context("Failed to create GitHub client")?;

    match client.fetch_all(&handle).await {
        Ok(repositories) => Ok(repositories),
        Err(e) => {
            print_placeholder(failure_message, format)?;
            Err(anyhow::Error::new(e)
                .context(format!("Failed to fetch repositories for {}", handle)))
        }
    }
}

async fn handle_featured_command(
    settings: &ShowcaseSettings,
    names: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let repositories = fetch_catalog(settings, format, FEATURED_LOAD_FAILED).await?;

    let explicit_names = if names.is_empty() {
        settings.featured_names()
    } else {
        Some(names.as_slice())
    };

    print!(
        "{}",
        featured_output(&repositories, explicit_names, format, Utc::now())?
    );
    Ok(())
}

/// Featured cards for a successfully fetched catalog; an empty selection is not a load failure
fn featured_output(
    repositories: &[RepositoryRecord],
    explicit_names: Option<&[String]>,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Result<String> {
    let featured = select_featured(repositories, explicit_names);
    format_records(&featured, format, NO_FEATURED, now)
}

async fn handle_list_command(
    settings: &ShowcaseSettings,
    criteria: FilterCriteria,
    format: OutputFormat,
) -> Result<()> {
    let repositories = fetch_catalog(settings, format, ALL_LOAD_FAILED).await?;
    let view = apply_filter_and_sort(&repositories, &criteria);

    print!("{}", format_records(&view, format, NO_MATCHES, Utc::now())?);
    Ok(())
}

async fn handle_languages_command(settings: &ShowcaseSettings, format: OutputFormat) -> Result<()> {
    let repositories = fetch_catalog(settings, format, ALL_LOAD_FAILED).await?;
    let languages = available_languages(&repositories);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&languages)?),
        OutputFormat::Markdown | OutputFormat::Html => {
            if languages.is_empty() {
                println!("No languages found.");
            }
            for language in languages {
                println!("{}", language);
            }
        }
    }

    Ok(())
}

async fn handle_browse_command(settings: &ShowcaseSettings, format: OutputFormat) -> Result<()> {
    let repositories = fetch_catalog(settings, format, ALL_LOAD_FAILED).await?;

    let mut session = CatalogSession::new(repositories);
    session.subscribe(move |view| {
        match format_records(view, format, NO_MATCHES, Utc::now()) {
            Ok(output) => print!("{}", output),
            Err(e) => tracing::error!("Failed to render cards: {}", e),
        }
    });
    session.notify();

    print_browse_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "search" => session.set_search_text(argument),
            "language" | "lang" => {
                let language = match argument {
                    "" | "all" => None,
                    language => Some(language.to_string()),
                };
                session.set_language_filter(language);
            }
            "sort" => match argument.parse::<SortMode>() {
                Ok(sort_mode) => session.set_sort_mode(sort_mode),
                Err(_) => eprintln!("Unknown sort mode '{}': use updated, stars or name", argument),
            },
            "languages" => {
                for language in session.languages() {
                    println!("{}", language);
                }
            }
            "help" => print_browse_help(),
            "quit" | "exit" => break,
            other => eprintln!("Unknown command '{}', type `help` for commands", other),
        }
    }

    Ok(())
}

fn print_browse_help() {
    eprintln!("Commands:");
    eprintln!("  search <text>        filter by name or description (empty clears)");
    eprintln!("  language <name|all>  filter by exact primary language");
    eprintln!("  sort <updated|stars|name>");
    eprintln!("  languages            list available languages");
    eprintln!("  quit");
}

/// Render records as cards, with update labels relative to `now`
fn format_records(
    records: &[RepositoryRecord],
    format: OutputFormat,
    empty_message: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let cards = render(records);

    let output = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Html => cards_html(&cards, empty_message).0,
        OutputFormat::Markdown => {
            if cards.is_empty() {
                return Ok(format!("{}\n", empty_message));
            }
            let mut output = String::new();
            for (record, card) in records.iter().zip(cards.iter()) {
                let label = relative_updated_label(record, now);
                output.push_str(&card_markdown(card, label.as_deref()).0);
                output.push_str("\n---\n");
            }
            output
        }
    };
    Ok(output)
}

fn print_placeholder(message: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "error": message }));
        }
        OutputFormat::Html => print!("{}", placeholder_html(message).0),
        OutputFormat::Markdown => println!("{}", message),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, stars: u64, fork: bool, updated_at: &str) -> RepositoryRecord {
        RepositoryRecord {
            stargazers_count: stars,
            fork,
            updated_at: updated_at.to_string(),
            html_url: format!("https://github.com/octocat/{}", name),
            ..RepositoryRecord::new(name)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_featured_selection_is_not_a_load_failure() {
        let all_forks = vec![
            record("mirror", 9, true, "2024-06-29T12:00:00Z"),
            record("upstream-copy", 3, true, "2024-06-01T12:00:00Z"),
        ];

        let output = featured_output(&all_forks, None, OutputFormat::Markdown, now()).unwrap();
        assert_eq!(output, format!("{}\n", NO_FEATURED));
        assert!(!output.contains(FEATURED_LOAD_FAILED));

        let unknown = vec!["missing".to_string()];
        let output =
            featured_output(&all_forks, Some(unknown.as_slice()), OutputFormat::Html, now())
                .unwrap();
        assert!(output.contains(NO_FEATURED));
        assert!(!output.contains(FEATURED_LOAD_FAILED));
    }

    #[test]
    fn test_featured_output_ranks_non_forks() {
        let all = vec![
            record("mirror", 9, true, "2024-06-29T12:00:00Z"),
            record("tool", 4, false, "2024-06-29T12:00:00Z"),
        ];

        let output = featured_output(&all, None, OutputFormat::Markdown, now()).unwrap();
        assert!(output.contains("## tool"));
        assert!(!output.contains("## mirror"));
    }

    #[test]
    fn test_markdown_cards_carry_updated_labels() {
        let view = vec![
            record("fresh", 1, false, "2024-06-29T12:00:00Z"),
            record("stale", 1, false, "2023-01-15T08:00:00Z"),
            record("unknown", 1, false, "not a timestamp"),
        ];

        let output = format_records(&view, OutputFormat::Markdown, NO_MATCHES, now()).unwrap();
        assert!(output.contains("## fresh\n"));
        assert!(output.contains("Updated: Yesterday\n"));
        assert!(output.contains("Updated: 2023-01-15\n"));
        assert_eq!(output.matches("Updated:").count(), 2);
        assert_eq!(output.matches("\n---\n").count(), 3);
    }

    #[test]
    fn test_browse_view_renders_like_list() {
        let mut session = CatalogSession::new(vec![
            record("alpha", 2, false, "2024-06-25T12:00:00Z"),
            record("beta", 5, false, "2024-06-29T12:00:00Z"),
        ]);
        let rendered = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&rendered);
        session.subscribe(move |view| {
            let output = format_records(view, OutputFormat::Markdown, NO_MATCHES, now()).unwrap();
            sink.lock().unwrap().push(output);
        });

        session.set_search_text("alp");
        session.set_search_text("nothing-matches");

        let rendered = rendered.lock().unwrap();
        assert!(rendered[0].contains("## alpha"));
        assert!(rendered[0].contains("Updated: 5 days ago"));
        assert_eq!(rendered[1], format!("{}\n", NO_MATCHES));
    }
}
