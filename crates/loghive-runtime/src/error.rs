use std::fmt;

/// Result type for loghive-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Primary store error
    Store(loghive_store::Error),

    /// Search index error
    Search(loghive_search::Error),

    /// Provider scan failed
    Provider(anyhow::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// A pushed import request failed validation before any write
    InvalidRequest(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "Store error: {}", err),
            Error::Search(err) => write!(f, "Search error: {}", err),
            Error::Provider(err) => write!(f, "Provider error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidRequest(msg) => write!(f, "Invalid import request: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Search(err) => Some(err),
            Error::Provider(err) => Some(err.as_ref()),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::InvalidRequest(_) => None,
        }
    }
}

impl From<loghive_store::Error> for Error {
    fn from(err: loghive_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<loghive_search::Error> for Error {
    fn from(err: loghive_search::Error) -> Self {
        Error::Search(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
