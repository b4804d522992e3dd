use std::fmt;

/// Result type for tracelift CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the CLI boundary
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure talking to the ingestion endpoint
    Transport(reqwest::Error),

    /// The ingestion endpoint rejected the batch
    Sink(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(err) => write!(f, "Transport error: {}", err),
            Error::Sink(msg) => write!(f, "Ingestion error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::Sink(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}
