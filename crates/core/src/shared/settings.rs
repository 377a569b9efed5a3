use std::time::Duration;

use super::constants::{
    DEFAULT_AUDIO_CHANNEL_COUNT, DEFAULT_BUCKET, DEFAULT_LANGUAGE_CODE, DEFAULT_PHRASE_BOOST,
    DEFAULT_POLL_INTERVAL, DEFAULT_RECOGNITION_TIMEOUT, DEFAULT_SAMPLE_RATE_HERTZ,
};

/// Values that parameterize one pipeline run.
///
/// The recognition fields must describe the uploaded audio; nothing checks
/// them against the file.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionSettings {
    pub bucket: String,
    pub language_code: String,
    pub sample_rate_hertz: u32,
    pub audio_channel_count: u16,
    pub phrase_boost: f32,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            sample_rate_hertz: DEFAULT_SAMPLE_RATE_HERTZ,
            audio_channel_count: DEFAULT_AUDIO_CHANNEL_COUNT,
            phrase_boost: DEFAULT_PHRASE_BOOST,
            timeout: DEFAULT_RECOGNITION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TranscriptionSettings {
    /// `gs://` URI under which the recognition service reads an uploaded object.
    pub fn storage_uri(&self, object_name: &str) -> String {
        format!("gs://{}/{}", self.bucket, object_name)
    }
}
