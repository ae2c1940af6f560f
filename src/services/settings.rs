//! Settings persistence
//!
//! The presentation layer reads the account handle, the explicit featured
//! list, and client options from a TOML file. Environment and command-line
//! values are layered on top by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::github::client::DEFAULT_API_BASE_URL;
use crate::types::AccountHandle;

/// Environment variable overriding the configured account handle
pub const USERNAME_ENV_VAR: &str = "GITHUB_SHOWCASE_USERNAME";

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Showcase settings as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseSettings {
    /// Account whose repositories are listed
    #[serde(default)]
    pub username: Option<String>,
    /// Explicit featured repositories, in display order
    #[serde(default)]
    pub featured: Vec<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout; absent means requests are never cut short
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            username: None,
            featured: Vec::new(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ShowcaseSettings {
    /// Apply the username environment override, if set and non-blank
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(username) = std::env::var(USERNAME_ENV_VAR) {
            if !username.trim().is_empty() {
                self.username = Some(username);
            }
        }
        self
    }

    /// The validated account handle
    pub fn account_handle(&self) -> Result<AccountHandle, SettingsError> {
        let username = self.username.as_deref().ok_or_else(|| {
            SettingsError::MissingUsername(format!(
                "set `username` in the settings file, {} or --username",
                USERNAME_ENV_VAR
            ))
        })?;
        AccountHandle::parse(username).map_err(SettingsError::InvalidValue)
    }

    /// The featured list, or `None` when the default ranking should be used
    pub fn featured_names(&self) -> Option<&[String]> {
        if self.featured.is_empty() {
            None
        } else {
            Some(self.featured.as_slice())
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Check values that would otherwise only fail at request time
    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed = url::Url::parse(&self.api_base_url).map_err(|e| {
            SettingsError::InvalidValue(format!(
                "api_base_url '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidValue(format!(
                "api_base_url '{}' must use http or https",
                self.api_base_url
            )));
        }
        if let Some(username) = &self.username {
            AccountHandle::parse(username).map_err(SettingsError::InvalidValue)?;
        }
        Ok(())
    }
}

/// Settings errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Settings file already exists
    AlreadyExists(String),
    /// No account handle configured anywhere
    MissingUsername(String),
    /// A value failed validation
    InvalidValue(String),
    /// IO error during persistence
    IoError(String),
    /// Serialization error
    SerializationError(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(path) => write!(f, "Settings file '{}' already exists", path),
            Self::MissingUsername(hint) => write!(f, "No GitHub username configured: {}", hint),
            Self::InvalidValue(msg) => write!(f, "Invalid setting: {}", msg),
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Loads and saves `ShowcaseSettings` at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform default location
    pub fn at_default_location() -> Result<Self, SettingsError> {
        Ok(Self::new(default_settings_dir()?.join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> Result<ShowcaseSettings, SettingsError> {
        if !self.path.exists() {
            tracing::debug!(
                "Settings file {} not found, using defaults",
                self.path.display()
            );
            return Ok(ShowcaseSettings::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SettingsError::IoError(e.to_string()))?;

        let settings: ShowcaseSettings = toml::from_str(&content)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings, creating the parent directory if needed
    pub fn save(&self, settings: &ShowcaseSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::IoError(e.to_string()))?;
        }

        let toml_content = toml::to_string(settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        std::fs::write(&self.path, toml_content)
            .map_err(|e| SettingsError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Write default settings, refusing to clobber an existing file unless `force`
    pub fn init(&self, force: bool) -> Result<ShowcaseSettings, SettingsError> {
        if self.path.exists() && !force {
            return Err(SettingsError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }
        let settings = ShowcaseSettings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

/// Get the default directory for the settings file
///
/// Returns `~/.config/github-showcase/` on Unix-like systems
pub fn default_settings_dir() -> Result<PathBuf, SettingsError> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| SettingsError::IoError("Unable to determine home directory".to_string()))?;

    #[cfg(all(unix, not(target_os = "macos")))]
    let settings_dir = home_dir.join(".config/github-showcase");

    #[cfg(windows)]
    let settings_dir = home_dir.join("AppData/Roaming/github-showcase");

    #[cfg(target_os = "macos")]
    let settings_dir = home_dir.join("Library/Application Support/github-showcase");

    Ok(settings_dir)
}
