use std::time::Duration;

pub const DEFAULT_BUCKET: &str = "wordist-productions";

pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
pub const DEFAULT_SAMPLE_RATE_HERTZ: u32 = 44100;
pub const DEFAULT_AUDIO_CHANNEL_COUNT: u16 = 1;

/// Boost applied to the lyric speech context.
pub const DEFAULT_PHRASE_BOOST: f32 = 20.0;

pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Reporter flushes its line buffer whenever `word_index % REPORT_FLUSH_EVERY == 0`.
pub const REPORT_FLUSH_EVERY: usize = 10;

pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com";
pub const SPEECH_API_BASE: &str = "https://speech.googleapis.com/v1p1beta1";

/// Environment variable conventionally holding the service-account key path.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
