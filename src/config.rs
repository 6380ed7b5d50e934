//! Run configuration.
//!
//! [`Config`] holds the raw values as read from the command line or the CI
//! runtime's `INPUT_*` variables. [`Config::validate`] turns it into
//! [`Settings`], which is what the rest of the program consumes. Empty values
//! count as absent because CI runtimes pass unset inputs as empty strings.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::auth::DEFAULT_SCOPE;
use crate::logging::LogFormat;
use crate::url_parser::extract_id;

/// Errors raised while validating a [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required input '{0}'")]
    Missing(&'static str),

    #[error("either 'filename' or 'fileId' must be provided")]
    NoTarget,

    #[error("'folderId' must be provided to find {0}")]
    MissingFolder(String),

    #[error("invalid value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Download one or more files from Google Drive.
#[derive(Parser, Clone, Default)]
#[command(name = "drive_fetch")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Credentials JSON (service account key or authorized user), inline or as a file path.
    #[arg(long, env = "INPUT_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Name or glob pattern of the file(s) to download.
    #[arg(long, env = "INPUT_FILENAME")]
    pub filename: Option<String>,

    /// ID or URL of the file to download; takes precedence over --filename.
    #[arg(long = "file-id", env = "INPUT_FILEID")]
    pub file_id: Option<String>,

    /// ID or URL of the folder to search in.
    #[arg(long = "folder-id", env = "INPUT_FOLDERID")]
    pub folder_id: Option<String>,

    /// Local destination: a file path, or a directory when it ends with '/'.
    #[arg(long = "download-location", env = "INPUT_DOWNLOADLOCATION")]
    pub download_location: Option<String>,

    /// Restrict listing to one Shared Drive.
    #[arg(long = "drive-id", env = "DRIVE_ID")]
    pub drive_id: Option<String>,

    /// OAuth scope requested for service account tokens.
    #[arg(long, env = "DRIVE_SCOPE", default_value = DEFAULT_SCOPE)]
    pub scope: String,

    /// Fail when the name or pattern matches no files.
    #[arg(long = "fail-on-empty", env = "FAIL_ON_EMPTY")]
    pub fail_on_empty: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Where credentials come from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Inline(String),
    File(PathBuf),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(<redacted>)"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// What to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    ById(String),
    ByName { folder_id: String, name: String },
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials: CredentialSource,
    pub target: Target,
    pub download_location: PathBuf,
    pub drive_id: Option<String>,
    pub scope: String,
    pub fail_on_empty: bool,
}

impl Config {
    /// Check required inputs and normalise identifiers.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let credentials =
            present(&self.credentials).ok_or(ConfigError::Missing("credentials"))?;
        let credentials = if credentials.trim_start().starts_with('{') {
            CredentialSource::Inline(credentials.to_string())
        } else {
            CredentialSource::File(PathBuf::from(credentials.trim()))
        };

        let download_location = present(&self.download_location)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("downloadLocation"))?;

        let target = match (present(&self.file_id), present(&self.filename)) {
            (Some(file_id), _) => Target::ById(parse_id("fileId", file_id)?),
            (None, Some(name)) => {
                let folder = present(&self.folder_id)
                    .ok_or_else(|| ConfigError::MissingFolder(name.to_string()))?;
                Target::ByName {
                    folder_id: parse_id("folderId", folder)?,
                    name: name.to_string(),
                }
            }
            (None, None) => return Err(ConfigError::NoTarget),
        };

        let drive_id = present(&self.drive_id)
            .map(|id| parse_id("driveId", id))
            .transpose()?;

        let scope = match self.scope.trim() {
            "" => DEFAULT_SCOPE.to_string(),
            scope => scope.to_string(),
        };

        Ok(Settings {
            credentials,
            target,
            download_location,
            drive_id,
            scope,
            fail_on_empty: self.fail_on_empty,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("filename", &self.filename)
            .field("file_id", &self.file_id)
            .field("folder_id", &self.folder_id)
            .field("download_location", &self.download_location)
            .field("drive_id", &self.drive_id)
            .field("scope", &self.scope)
            .field("fail_on_empty", &self.fail_on_empty)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_id(field: &'static str, value: &str) -> Result<String, ConfigError> {
    extract_id(value).map_err(|e| ConfigError::Invalid {
        field,
        message: e.to_string(),
    })
}
