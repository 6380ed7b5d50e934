//! Streaming resolved files to the local filesystem.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::client::{ContentReader, DriveApi};
use crate::error::{DriveError, Result};
use crate::models::{format_size, FileRecord};

/// What happened to one record handed to [`Downloader::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Content was written to `path`.
    Saved { path: PathBuf, bytes: u64 },
    /// The record could not be downloaded and was left alone.
    Skipped { reason: String },
}

/// Writes file content fetched through a [`DriveApi`] to disk.
pub struct Downloader<'a> {
    api: &'a dyn DriveApi,
}

impl<'a> Downloader<'a> {
    pub fn new(api: &'a dyn DriveApi) -> Self {
        Self { api }
    }

    /// Download `record` to `destination`.
    ///
    /// A destination ending in a path separator is a directory and the file
    /// keeps its remote name inside it; anything else is the literal target
    /// path. Missing parent directories are created. Records without an id
    /// or name are skipped with a warning.
    pub async fn download(&self, record: &FileRecord, destination: &Path) -> Result<DownloadOutcome> {
        let (id, name) = match (record.id.as_deref(), record.name.as_deref()) {
            (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => (id, name),
            _ => return Ok(skip(record, "file has no id or name")),
        };

        let into_dir = is_directory_path(destination);
        if into_dir && !is_plain_file_name(name) {
            return Ok(skip(record, "file name is not a single path component"));
        }

        let target = if into_dir {
            destination.join(name)
        } else {
            destination.to_path_buf()
        };

        let dir = if into_dir {
            Some(destination)
        } else {
            destination.parent().filter(|p| !p.as_os_str().is_empty())
        };
        if let Some(dir) = dir {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| DriveError::download(name, e))?;
        }

        info!(name, path = %target.display(), "downloading");

        let mut reader = self
            .api
            .open_content(id)
            .await
            .map_err(|e| DriveError::download(name, e))?;

        // Written beside the target and renamed over it on success only; on
        // failure the target is left as it was.
        let partial = partial_path(&target);
        let written = match write_to(&mut reader, &partial).await {
            Ok(bytes) => fs::rename(&partial, &target).await.map(|_| bytes),
            Err(e) => Err(e),
        };
        let bytes = match written {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(DriveError::download(name, e));
            }
        };

        info!(name, size = %format_size(bytes), "download complete");
        Ok(DownloadOutcome::Saved { path: target, bytes })
    }
}

async fn write_to(reader: &mut ContentReader, path: &Path) -> io::Result<u64> {
    let mut file = File::create(path).await?;
    let bytes = tokio::io::copy(reader, &mut file).await?;
    file.flush().await?;
    Ok(bytes)
}

/// Sibling path used while a download is in flight.
fn partial_path(target: &Path) -> PathBuf {
    let mut raw = target.as_os_str().to_owned();
    raw.push(".part");
    PathBuf::from(raw)
}

fn skip(record: &FileRecord, reason: &str) -> DownloadOutcome {
    warn!(record = %record, reason, "skipping file");
    DownloadOutcome::Skipped {
        reason: reason.to_string(),
    }
}

/// Whether `path` is spelled with a trailing separator.
pub fn is_directory_path(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR)
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
