use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::credentials::CredentialsError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} has no file name to use as an object name")]
    NoObjectName { path: PathBuf },
    #[error("{operation} of object {object} failed: {source}")]
    Transport {
        operation: &'static str,
        object: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} of object {object} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        object: String,
        status: u16,
        body: String,
    },
    #[error("failed to build storage client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("storage authentication failed: {0}")]
    Auth(#[from] CredentialsError),
}

/// Domain interface for a bucket of named blobs.
///
/// Each store is bound to one bucket; object names are flat keys within it.
pub trait ObjectStore: Send {
    fn exists(&self, object_name: &str) -> Result<bool, StorageError>;

    /// Upload the full contents of `source` under `object_name`.
    fn upload(&self, object_name: &str, source: &Path) -> Result<(), StorageError>;
}

/// Object name for a local file: its base filename.
pub fn object_name_for(path: &Path) -> Result<String, StorageError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| StorageError::NoObjectName {
            path: path.to_path_buf(),
        })
}
