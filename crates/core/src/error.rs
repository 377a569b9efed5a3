use thiserror::Error;

use crate::lyrics::domain::lyric_source::LyricError;
use crate::recognition::domain::speech_recognizer::RecognitionError;
use crate::storage::domain::object_store::StorageError;

/// Any failure of a pipeline run. None are recovered; they end the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Lyrics(#[from] LyricError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error("failed to write transcript: {0}")]
    Report(#[source] std::io::Error),
}
