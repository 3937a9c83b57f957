//! Error taxonomy shared by every panel
//!
//! Each variant maps to one failure class a panel can show. Panels never
//! propagate these further: the effect handler turns them into a message.

/// Errors produced by fetch, mapping and storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Connection, DNS or transport failure (including relay failures).
    #[error("network error: {0}")]
    Network(String),

    /// The upstream answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The body was not JSON, or not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The upstream reported a failure inside an otherwise successful body.
    #[error("{message}")]
    Upstream { message: String },

    /// A required form field is empty. Raised before any network call.
    #[error("{0}")]
    MissingInput(String),

    /// A required weather series is absent from the response.
    #[error("weather series `{0}` missing from response")]
    MissingSeries(String),

    /// The weather response contained no location record.
    #[error("no such city")]
    EmptyLocation,

    /// The key-value store could not be read or written.
    #[error("key store error: {0}")]
    Storage(String),
}

impl Error {
    /// Status code for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Error::MissingInput(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
