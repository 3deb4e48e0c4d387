use thiserror::Error;

/// Why a price could not be fetched. The monitor reports every kind the
/// same way and retries after its backoff delay.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0} not found. Try using the symbol instead (e.g., BTC for Bitcoin)")]
    NotFound(String),

    #[error("API rate limit exceeded. Please wait before trying again.")]
    RateLimited,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for FetchError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;

        match err {
            WsError::Http(response) => match response.status().as_u16() {
                401 | 403 => FetchError::Unauthorized(format!("HTTP {}", response.status())),
                418 | 429 => FetchError::RateLimited,
                _ => FetchError::Transport(format!("HTTP {}", response.status())),
            },
            other => FetchError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Transport(format!("malformed ticker payload: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Invalid price sample: {0}")]
    InvalidSample(String),

    #[error("Rule '{rule}' failed: {reason}")]
    RuleEvaluation { rule: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
