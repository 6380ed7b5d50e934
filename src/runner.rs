//! One run: resolve the configured target, then download each match in order.

use tracing::{error, info};

use crate::client::DriveApi;
use crate::config::{Settings, Target};
use crate::download::{DownloadOutcome, Downloader};
use crate::error::{DriveError, Result};
use crate::models::FileRecord;
use crate::resolver::FileResolver;

/// Per-record results of a run.
#[derive(Debug, Default)]
pub struct Summary {
    pub saved: usize,
    pub skipped: usize,
    /// Download errors, in the order the records were processed.
    pub failures: Vec<DriveError>,
}

impl Summary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.failed()
    }

    /// True when no download failed. Skipped records do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Downloaded {} file(s), skipped {}, failed {}.",
            self.saved,
            self.skipped,
            self.failed()
        )
    }
}

/// Resolve `settings.target` and download every match sequentially.
///
/// Resolution failures end the run with an error and nothing is downloaded.
/// A failed download is logged and recorded in the summary, and the loop
/// moves on to the next record.
pub async fn run(settings: &Settings, api: &dyn DriveApi) -> Result<Summary> {
    let files = resolve_target(settings, api).await?;

    let downloader = Downloader::new(api);
    let mut summary = Summary::default();

    for file in &files {
        match downloader.download(file, &settings.download_location).await {
            Ok(DownloadOutcome::Saved { .. }) => summary.saved += 1,
            Ok(DownloadOutcome::Skipped { .. }) => summary.skipped += 1,
            Err(e) => {
                error!(error = %e, "download failed");
                summary.failures.push(e);
            }
        }
    }

    info!(
        saved = summary.saved,
        skipped = summary.skipped,
        failed = summary.failed(),
        "finished"
    );
    Ok(summary)
}

async fn resolve_target(settings: &Settings, api: &dyn DriveApi) -> Result<Vec<FileRecord>> {
    let resolver = FileResolver::new(api);

    match &settings.target {
        Target::ById(file_id) => Ok(vec![resolver.resolve_by_id(file_id).await?]),
        Target::ByName { folder_id, name } => {
            let files = resolver.resolve(folder_id, name).await?;
            if files.is_empty() && settings.fail_on_empty {
                return Err(DriveError::NoFilesMatched(name.clone()));
            }
            Ok(files)
        }
    }
}
