use std::path::{Path, PathBuf};

use thiserror::Error;

use super::lyric_segment::LyricSegment;

#[derive(Error, Debug)]
pub enum LyricError {
    #[error("failed to read lyrics from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lyrics at {path} are not valid UTF-16: {reason}")]
    Encoding { path: PathBuf, reason: String },
    #[error("failed to parse lyrics at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Domain interface for reading lyric segments from a resource.
pub trait LyricSource: Send {
    fn load_segments(&self, path: &Path) -> Result<Vec<LyricSegment>, LyricError>;
}
