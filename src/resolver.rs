//! Resolution of a folder + name (or a bare file id) into file records.

use tracing::{debug, info};

use crate::client::DriveApi;
use crate::error::{DriveError, Result};
use crate::models::FileRecord;
use crate::pattern::QueryPlan;

/// Looks up file records through a [`DriveApi`].
pub struct FileResolver<'a> {
    api: &'a dyn DriveApi,
}

impl<'a> FileResolver<'a> {
    pub fn new(api: &'a dyn DriveApi) -> Self {
        Self { api }
    }

    /// Find the files in `container` named `name`.
    ///
    /// A plain name is looked up with a single equality query and the
    /// service's answer is returned as is; duplicates are possible. A glob
    /// pattern is listed with a broader query and then filtered by its exact
    /// matcher. Server order is preserved either way, and an empty result is
    /// not an error.
    pub async fn resolve(&self, container: &str, name: &str) -> Result<Vec<FileRecord>> {
        let plan = QueryPlan::for_name(name)?;
        let query = plan.scoped_to(container);

        if plan.matcher().is_some() {
            info!(pattern = name, container, "resolving glob pattern");
        } else {
            info!(name, container, "resolving file by name");
        }
        debug!(%query, "drive query");

        let files = self
            .api
            .list_files(&query)
            .await
            .map_err(|e| DriveError::lookup(query.as_str(), e))?;
        let listed = files.len();

        let files: Vec<FileRecord> = files
            .into_iter()
            .filter(|file| {
                plan.matcher().is_none()
                    || file.name.as_deref().is_some_and(|n| plan.matches(n))
            })
            .collect();

        info!(listed, matched = files.len(), "resolved files");
        Ok(files)
    }

    /// Fetch a single record by identifier, bypassing name resolution.
    pub async fn resolve_by_id(&self, file_id: &str) -> Result<FileRecord> {
        info!(file_id, "resolving file by id");
        match self.api.get_file(file_id).await {
            Ok(record) => Ok(record),
            Err(DriveError::FileNotFound(id)) => Err(DriveError::FileNotFound(id)),
            Err(e) => Err(DriveError::lookup(format!("id = '{}'", file_id), e)),
        }
    }
}
