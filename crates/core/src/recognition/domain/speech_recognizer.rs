use std::time::Duration;

use thiserror::Error;

use super::recognition_request::RecognitionRequest;
use super::transcript::RecognitionResult;
use crate::shared::credentials::CredentialsError;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("recognition authentication failed: {0}")]
    Auth(#[from] CredentialsError),
    #[error("recognition operation failed with code {code}: {message}")]
    Operation { code: i32, message: String },
    #[error("malformed recognition response: {0}")]
    Malformed(String),
    #[error("recognition operation {operation} did not finish within {}s", .timeout.as_secs())]
    Timeout { operation: String, timeout: Duration },
}

/// Server-side name of a submitted long-running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    Running { progress_percent: Option<u32> },
    Done(Vec<RecognitionResult>),
}

/// Domain interface for a long-running speech-to-text service.
///
/// `start` submits the job and returns immediately; `poll` reports where it
/// stands. A job that finished with an error surfaces as `Err` from `poll`.
pub trait SpeechRecognizer: Send {
    fn start(&self, request: &RecognitionRequest) -> Result<OperationHandle, RecognitionError>;

    fn poll(&self, operation: &OperationHandle) -> Result<OperationStatus, RecognitionError>;
}
