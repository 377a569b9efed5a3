use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::CLOUD_PLATFORM_SCOPE;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("failed to read credentials from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed service account key: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to sign token assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token exchange failed at {url}: {source}")]
    Exchange {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("system clock is set before the unix epoch")]
    Clock,
}

/// The fields of a service-account JSON key that the token flow needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let json = fs::read_to_string(path).map_err(|e| CredentialsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        serde_json::from_str(json).map_err(CredentialsError::Parse)
    }

    fn claims(&self, scope: &str, issued_at: u64) -> AssertionClaims {
        AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }

    fn signed_assertion(&self, scope: &str, issued_at: u64) -> Result<String, CredentialsError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(CredentialsError::Signing)?;
        jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &self.claims(scope, issued_at),
            &key,
        )
        .map_err(CredentialsError::Signing)
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

/// Supplies bearer tokens to the service adapters.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Result<String, CredentialsError>;
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: u64,
}

impl CachedToken {
    fn is_fresh(&self, now: u64) -> bool {
        now + REFRESH_MARGIN_SECS < self.expires_at
    }
}

/// OAuth2 service-account flow: a signed JWT is exchanged for a bearer token,
/// which is cached until shortly before it expires.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    scope: String,
    client: reqwest::blocking::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            client: reqwest::blocking::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?))
    }

    fn exchange(&self, now: u64) -> Result<CachedToken, CredentialsError> {
        let assertion = self.key.signed_assertion(&self.scope, now)?;
        let url = &self.key.token_uri;
        let exchange_err = |e: reqwest::Error| CredentialsError::Exchange {
            url: url.clone(),
            source: e,
        };

        log::debug!("Requesting access token for {}", self.key.client_email);
        let body: TokenResponse = self
            .client
            .post(url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<TokenResponse>())
            .map_err(exchange_err)?;

        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + body.expires_in,
        })
    }
}

impl TokenSource for ServiceAccountTokenSource {
    fn access_token(&self) -> Result<String, CredentialsError> {
        let now = unix_now()?;
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }
        let token = self.exchange(now)?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

/// A fixed token, for callers that already hold one (e.g. from `gcloud auth print-access-token`).
#[derive(Debug, Clone)]
pub struct StaticTokenSource(pub String);

impl TokenSource for StaticTokenSource {
    fn access_token(&self) -> Result<String, CredentialsError> {
        Ok(self.0.clone())
    }
}

fn unix_now() -> Result<u64, CredentialsError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| CredentialsError::Clock)
}
