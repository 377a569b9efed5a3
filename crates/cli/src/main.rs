use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use lyric_transcribe_core::lyrics::infrastructure::yaml_lyric_reader::YamlLyricReader;
use lyric_transcribe_core::pipeline::pipeline_logger::SummaryPipelineLogger;
use lyric_transcribe_core::pipeline::transcribe_song_use_case::TranscribeSongUseCase;
use lyric_transcribe_core::recognition::infrastructure::google_speech_recognizer::GoogleSpeechRecognizer;
use lyric_transcribe_core::shared::constants::{
    CREDENTIALS_ENV_VAR, DEFAULT_AUDIO_CHANNEL_COUNT, DEFAULT_BUCKET, DEFAULT_LANGUAGE_CODE,
    DEFAULT_PHRASE_BOOST, DEFAULT_RECOGNITION_TIMEOUT, DEFAULT_SAMPLE_RATE_HERTZ,
};
use lyric_transcribe_core::shared::credentials::{ServiceAccountTokenSource, TokenSource};
use lyric_transcribe_core::shared::settings::TranscriptionSettings;
use lyric_transcribe_core::storage::infrastructure::gcs_object_store::GcsObjectStore;

/// Transcribe a vocal track with its lyrics as recognition hints.
#[derive(Parser)]
#[command(name = "lyric-transcribe")]
struct Cli {
    /// Audio file to transcribe (uploaded under its file name if absent).
    #[arg(default_value = "resources/vocals_mono.wav")]
    audio: PathBuf,

    /// UTF-16 YAML lyric file: a list of segments with a `text` field.
    #[arg(default_value = "resources/lyrics.yaml")]
    lyrics: PathBuf,

    /// Service account key file (defaults to $GOOGLE_APPLICATION_CREDENTIALS).
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Storage bucket holding the audio.
    #[arg(long, default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Recognition language (BCP-47).
    #[arg(long, default_value = DEFAULT_LANGUAGE_CODE)]
    language: String,

    /// Sample rate of the audio in Hz.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE_HERTZ)]
    sample_rate: u32,

    /// Channel count of the audio (2 for the stereo mix).
    #[arg(long, default_value_t = DEFAULT_AUDIO_CHANNEL_COUNT)]
    channels: u16,

    /// Boost applied to the lyric phrases.
    #[arg(long, default_value_t = DEFAULT_PHRASE_BOOST)]
    boost: f32,

    /// Seconds to wait for recognition before giving up.
    #[arg(long, default_value_t = DEFAULT_RECOGNITION_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Write the recognition results as JSON to this file.
    #[arg(long)]
    save_response: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", describe(e.as_ref()));
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let credentials = resolve_credentials(cli.credentials.as_deref())?;
    log::info!("Using credentials from {}", credentials.display());
    let tokens: Arc<dyn TokenSource> = Arc::new(ServiceAccountTokenSource::from_file(&credentials)?);

    let settings = TranscriptionSettings {
        bucket: cli.bucket.clone(),
        language_code: cli.language.clone(),
        sample_rate_hertz: cli.sample_rate,
        audio_channel_count: cli.channels,
        phrase_boost: cli.boost,
        timeout: Duration::from_secs(cli.timeout_secs),
        ..Default::default()
    };

    let mut use_case = TranscribeSongUseCase::new(
        Box::new(GcsObjectStore::new(&settings.bucket, tokens.clone())?),
        Box::new(YamlLyricReader::new()),
        Box::new(GoogleSpeechRecognizer::new(tokens)),
        settings,
        Box::new(SummaryPipelineLogger::new()),
    );

    let stdout = io::stdout();
    let results = use_case.execute(&cli.audio, &cli.lyrics, &mut stdout.lock())?;

    if let Some(path) = cli.save_response {
        fs::write(&path, serde_json::to_string_pretty(&results)?)?;
        log::info!("Recognition results written to {}", path.display());
    }

    Ok(())
}

fn resolve_credentials(flag: Option<&Path>) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    std::env::var_os(CREDENTIALS_ENV_VAR)
        .map(PathBuf::from)
        .ok_or_else(|| format!("No credentials: pass --credentials or set {CREDENTIALS_ENV_VAR}").into())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if !cli.audio.exists() {
        return Err(format!("Audio file not found: {}", cli.audio.display()).into());
    }
    if !cli.lyrics.exists() {
        return Err(format!("Lyrics file not found: {}", cli.lyrics.display()).into());
    }
    if cli.channels == 0 {
        return Err("Channel count must be at least 1".into());
    }
    if cli.sample_rate == 0 {
        return Err("Sample rate must be positive".into());
    }
    if cli.timeout_secs == 0 {
        return Err("Timeout must be at least one second".into());
    }
    Ok(())
}

/// The error message followed by each underlying cause not already quoted in it.
fn describe(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str("\n  caused by: ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
