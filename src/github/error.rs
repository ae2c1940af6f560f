/// Failure of a repository listing request.
///
/// Every variant is terminal: nothing is retried, and callers treat all of
/// them as the same "could not load" outcome. The variants only exist so the
/// cause can be logged and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The service answered with a non-success status
    Status { status: u16, message: String },
    /// The request never produced a response (connection, TLS, timeout)
    Transport(String),
    /// The response body was not a JSON array of repositories
    MalformedBody(String),
    /// The request could not be built (bad base URL or handle)
    InvalidRequest(String),
}

impl FetchError {
    /// Convert octocrab error to the matching fetch failure
    pub fn from_octocrab_error(error: octocrab::Error) -> Self {
        tracing::debug!("Raw octocrab error: {:?}", error);

        let result = match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                tracing::error!(
                    "GitHub API error - Status: {}, Message: {:?}, Documentation: {:?}",
                    status,
                    source.message,
                    source.documentation_url
                );
                Self::Status {
                    status,
                    message: source.message.clone(),
                }
            }
            octocrab::Error::Http { .. } | octocrab::Error::Hyper { .. } => {
                let error_msg = format!("HTTP layer error: {}", error);
                tracing::error!("{}", error_msg);
                Self::Transport(error_msg)
            }
            octocrab::Error::Json { .. } | octocrab::Error::Serde { .. } => {
                let error_msg = format!("JSON parsing error: {}", error);
                tracing::error!("{}", error_msg);
                Self::MalformedBody(error_msg)
            }
            octocrab::Error::Uri { .. } | octocrab::Error::UriParse { .. } => {
                let error_msg = format!("URI parsing error: {}", error);
                tracing::error!("{}", error_msg);
                Self::InvalidRequest(error_msg)
            }
            _ => {
                // Service and connector errors surface here; treat them as transport failures
                let error_msg = format!("Request failed: {}", error);
                tracing::error!("{}", error_msg);
                Self::Transport(error_msg)
            }
        };

        tracing::debug!("Fetch error classification: {:?}", result);
        result
    }

    /// Whether the service itself answered (as opposed to a transport failure)
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, message } => {
                write!(f, "GitHub API error ({}): {}", status, message)
            }
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::MalformedBody(msg) => write!(f, "Malformed response body: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
