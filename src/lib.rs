//! drive_fetch - download files from Google Drive by id, name or glob pattern.
//!
//! This library provides functionality to:
//! - Resolve a file name or glob pattern inside a Drive folder
//! - Fetch a single file record by id
//! - Stream resolved files to the local filesystem
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use drive_fetch::{Authenticator, DriveClient, Downloader, FileResolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_file("service-account.json")?;
//!     let client = DriveClient::new(auth, None);
//!
//!     let files = FileResolver::new(&client).resolve("folder-id", "*.csv").await?;
//!     let downloader = Downloader::new(&client);
//!     for file in &files {
//!         downloader.download(file, Path::new("out/")).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod logging;
pub mod models;
pub mod pattern;
pub mod resolver;
pub mod runner;
pub mod url_parser;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::{DriveApi, DriveClient};
pub use config::{Config, Settings, Target};
pub use download::{DownloadOutcome, Downloader};
pub use error::{DriveError, Result};
pub use models::FileRecord;
pub use pattern::{is_pattern, translate, QueryPlan};
pub use resolver::FileResolver;
pub use runner::{run, Summary};
pub use url_parser::extract_id;
