//! Error types for the drive_fetch crate.

use thiserror::Error;

/// Errors that can occur while resolving or downloading Drive files.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    /// A list or get call failed while resolving a target.
    #[error("Lookup failed for query `{query}`: {source}")]
    LookupError {
        query: String,
        #[source]
        source: Box<DriveError>,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Opening, reading or writing the content of one file failed.
    #[error("Unable to download {name}: {source}")]
    DownloadError {
        name: String,
        #[source]
        source: Box<DriveError>,
    },

    #[error("No files matched: {0}")]
    NoFilesMatched(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),
}

impl DriveError {
    /// Wrap a transport or API failure raised while running `query`.
    pub fn lookup(query: impl Into<String>, source: DriveError) -> Self {
        Self::LookupError {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure that happened while downloading `name`.
    pub fn download(name: impl Into<String>, source: impl Into<DriveError>) -> Self {
        Self::DownloadError {
            name: name.into(),
            source: Box::new(source.into()),
        }
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
