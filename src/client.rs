//! Google Drive API client.

use std::io;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileRecord};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested for every file record.
const FILE_FIELDS: &str = "id, name, parents";

/// A readable stream over a file's content.
pub type ContentReader = Box<dyn AsyncRead + Send + Unpin>;

/// Operations the resolver and downloader need from the remote store.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List the files matching a Drive query. Only the first page is returned.
    async fn list_files(&self, query: &str) -> Result<Vec<FileRecord>>;

    /// Fetch a single file record. Returns [`DriveError::FileNotFound`] if
    /// no file has this identifier.
    async fn get_file(&self, file_id: &str) -> Result<FileRecord>;

    /// Open a stream over the content of a file.
    async fn open_content(&self, file_id: &str) -> Result<ContentReader>;
}

/// Drive client authenticating every request with an [`Authenticator`].
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
    drive_id: Option<String>,
}

impl DriveClient {
    /// Create a new DriveClient.
    ///
    /// # Arguments
    /// * `auth` - Authenticator for obtaining access tokens
    /// * `drive_id` - Shared Drive to search in; `None` searches every drive
    ///   the principal can see
    pub fn new(auth: Authenticator, drive_id: Option<String>) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
            drive_id,
        }
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.base_url, file_id)
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn list_files(&self, query: &str) -> Result<Vec<FileRecord>> {
        let token = self.auth.get_access_token().await?;
        let fields = format!("nextPageToken, files({})", FILE_FIELDS);

        let mut request = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[
                ("q", query),
                ("fields", fields.as_str()),
                ("includeItemsFromAllDrives", "true"),
                ("supportsAllDrives", "true"),
            ]);

        if let Some(drive_id) = &self.drive_id {
            request = request.query(&[("corpora", "drive"), ("driveId", drive_id.as_str())]);
        }

        debug!(query, "listing files");
        let response = check_status(request.send().await?).await?;
        let list_response: FileListResponse = response.json().await?;

        if list_response.next_page_token.is_some() {
            warn!(
                query,
                returned = list_response.files.len(),
                "more results are available than one page; only the first page is used"
            );
        }

        Ok(list_response.files)
    }

    async fn get_file(&self, file_id: &str) -> Result<FileRecord> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(self.file_url(file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", FILE_FIELDS)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DriveError::FileNotFound(file_id.to_string()));
        }

        let record: FileRecord = check_status(response).await?.json().await?;
        Ok(record)
    }

    async fn open_content(&self, file_id: &str) -> Result<ContentReader> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(self.file_url(file_id))
            .bearer_auth(&token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DriveError::FileNotFound(file_id.to_string()));
        }

        let stream = check_status(response)
            .await?
            .bytes_stream()
            .map_err(io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }
}

/// Turn a non-success response into an [`DriveError::ApiError`], decoding
/// Google's error envelope when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
