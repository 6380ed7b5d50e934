//! Access-token acquisition for Google APIs.
//!
//! Two credential shapes are supported: a service account key (exchanged via
//! a signed JWT assertion) and an `authorized_user` OAuth client holding a
//! refresh token. Callers only ever see [`Authenticator::get_access_token`].

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::models::{
    AuthorizedUserCredentials, Credentials, ServiceAccountCredentials, TokenResponse,
};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Default scope: files the principal created or was given access to.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Authenticator for Google APIs.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<Credentials>,
    scope: String,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create an authenticator from a credentials JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let credentials: Credentials = serde_json::from_str(json)?;
        Ok(Self::new(credentials))
    }

    /// Create an authenticator from a credentials JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Create a new authenticator from credentials, using [`DEFAULT_SCOPE`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            scope: DEFAULT_SCOPE.to_string(),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Override the OAuth scope requested for service account tokens.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + EXPIRY_BUFFER {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = match self.credentials.as_ref() {
            Credentials::ServiceAccount(creds) => self.exchange_jwt(creds).await?,
            Credentials::AuthorizedUser(creds) => self.exchange_refresh_token(creds).await?,
        };

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    /// Exchange a signed JWT assertion for an access token.
    async fn exchange_jwt(&self, creds: &ServiceAccountCredentials) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::AuthenticationError(e.to_string()))?
            .as_secs();
        let token_uri = creds.token_uri.as_deref().unwrap_or(TOKEN_URI);

        let claims = Claims {
            iss: creds.client_email.clone(),
            scope: self.scope.clone(),
            aud: token_uri.to_string(),
            iat: now,
            exp: now + 3600,
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(creds.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        debug!(client_email = %creds.client_email, "requesting service account token");
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];
        self.request_token(token_uri, &params).await
    }

    /// Exchange a refresh token for an access token.
    async fn exchange_refresh_token(
        &self,
        creds: &AuthorizedUserCredentials,
    ) -> Result<CachedToken> {
        let token_uri = creds.token_uri.as_deref().unwrap_or(TOKEN_URI);

        debug!(client_id = %creds.client_id, "refreshing user access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
        ];
        self.request_token(token_uri, &params).await
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> Result<CachedToken> {
        let response = self.client.post(token_uri).form(params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.credentials.as_ref() {
            Credentials::ServiceAccount(_) => "service_account",
            Credentials::AuthorizedUser(_) => "authorized_user",
        };
        f.debug_struct("Authenticator")
            .field("credentials", &kind)
            .field("scope", &self.scope)
            .finish()
    }
}
