use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

use crate::shared::constants::{HTTP_CONNECT_TIMEOUT, STORAGE_API_BASE};
use crate::shared::credentials::TokenSource;
use crate::storage::domain::object_store::{ObjectStore, StorageError};

/// Google Cloud Storage bucket accessed through the JSON API.
///
/// Uploads use the single-request `uploadType=media` form, streaming the file
/// body. There is no resumable upload, so a failed transfer must be rerun.
/// Requests have a connect timeout but no total timeout, since an upload lasts
/// as long as the link needs to carry the whole file.
pub struct GcsObjectStore {
    bucket: String,
    tokens: Arc<dyn TokenSource>,
    client: Client,
    api_base: String,
}

impl GcsObjectStore {
    pub fn new(bucket: &str, tokens: Arc<dyn TokenSource>) -> Result<Self, StorageError> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(None)
            .build()
            .map_err(StorageError::Client)?;
        Ok(Self {
            bucket: bucket.to_string(),
            tokens,
            client,
            api_base: STORAGE_API_BASE.to_string(),
        })
    }

    /// Point the store at another endpoint, such as a local storage emulator.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn metadata_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.api_base,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(object_name)
        )
    }

    fn upload_url(&self, object_name: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.api_base,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(object_name)
        )
    }
}

impl ObjectStore for GcsObjectStore {
    fn exists(&self, object_name: &str) -> Result<bool, StorageError> {
        let token = self.tokens.access_token()?;
        let response = self
            .client
            .get(self.metadata_url(object_name))
            .bearer_auth(token)
            .send()
            .map_err(|e| StorageError::Transport {
                operation: "existence check",
                object: object_name.to_string(),
                source: e,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response, "existence check", object_name)?;
        Ok(true)
    }

    fn upload(&self, object_name: &str, source: &Path) -> Result<(), StorageError> {
        let file = File::open(source).map_err(|e| StorageError::ReadSource {
            path: source.to_path_buf(),
            source: e,
        })?;
        let token = self.tokens.access_token()?;

        log::debug!(
            "POST {} ({} -> gs://{}/{object_name})",
            self.upload_url(object_name),
            source.display(),
            self.bucket
        );
        let response = self
            .client
            .post(self.upload_url(object_name))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(file)
            .send()
            .map_err(|e| StorageError::Transport {
                operation: "upload",
                object: object_name.to_string(),
                source: e,
            })?;
        check_status(response, "upload", object_name)?;
        Ok(())
    }
}

fn check_status(
    response: Response,
    operation: &'static str,
    object_name: &str,
) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(StorageError::Status {
        operation,
        object: object_name.to_string(),
        status: status.as_u16(),
        body: response.text().unwrap_or_default(),
    })
}
