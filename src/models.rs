//! Data models for Google Drive API responses and credentials.

use serde::{Deserialize, Serialize};

/// A file record as returned by the Drive API.
///
/// The API only returns the fields that were requested and may omit `id` or
/// `name`, so both are optional here. Records missing either cannot be
/// downloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            parents: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.id.as_deref().unwrap_or("-");
        let name = self.name.as_deref().unwrap_or("-");
        write!(f, "{}\t{}", id, name)
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Credentials accepted by the authenticator, tagged by the `type` field
/// Google writes into its JSON key files.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
}

/// Service account credentials from JSON key file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// OAuth client credentials with a long-lived refresh token.
#[derive(Debug, Deserialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_file_record_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "report.csv",
            "parents": ["F1"]
        }"#;

        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("abc123"));
        assert_eq!(record.name.as_deref(), Some("report.csv"));
        assert_eq!(record.parents, vec!["F1".to_string()]);
    }

    #[test]
    fn test_file_record_missing_fields() {
        let record: FileRecord = serde_json::from_str(r#"{"name": "orphan.txt"}"#).unwrap();
        assert!(record.id.is_none());
        assert!(record.parents.is_empty());
        assert_eq!(format!("{}", record), "-\torphan.txt");
    }

    #[test]
    fn test_credentials_tagged_by_type() {
        let json = r#"{
            "type": "authorized_user",
            "client_id": "cid",
            "client_secret": "secret",
            "refresh_token": "rt"
        }"#;

        match serde_json::from_str::<Credentials>(json).unwrap() {
            Credentials::AuthorizedUser(creds) => assert_eq!(creds.refresh_token, "rt"),
            other => panic!("unexpected credentials: {:?}", other),
        }
    }

    #[test]
    fn test_service_account_ignores_extra_fields() {
        let json = r#"{
            "type": "service_account",
            "project_id": "demo",
            "client_email": "bot@demo.iam.gserviceaccount.com",
            "private_key": "key"
        }"#;

        match serde_json::from_str::<Credentials>(json).unwrap() {
            Credentials::ServiceAccount(creds) => {
                assert_eq!(creds.client_email, "bot@demo.iam.gserviceaccount.com");
                assert!(creds.token_uri.is_none());
            }
            other => panic!("unexpected credentials: {:?}", other),
        }
    }
}
