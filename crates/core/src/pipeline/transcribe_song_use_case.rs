use std::io::Write;
use std::path::Path;
use std::time::Instant;

use super::pipeline_logger::PipelineLogger;
use super::recognize_speech_use_case::RecognizeSpeechUseCase;
use super::upload_audio_use_case::UploadAudioUseCase;
use crate::error::PipelineError;
use crate::lyrics::domain::lyric_segment::flatten_lines;
use crate::lyrics::domain::lyric_source::LyricSource;
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::recognition::domain::transcript::RecognitionResult;
use crate::report::word_reporter::WordReporter;
use crate::shared::settings::TranscriptionSettings;
use crate::storage::domain::object_store::ObjectStore;

/// Full run: upload the audio, load the lyrics, recognize with the lyric
/// lines as hints, then print the words.
///
/// Steps run strictly in order; the first failure ends the run and nothing
/// is printed.
pub struct TranscribeSongUseCase {
    upload: UploadAudioUseCase,
    lyrics: Box<dyn LyricSource>,
    recognize: RecognizeSpeechUseCase,
    logger: Box<dyn PipelineLogger>,
}

impl TranscribeSongUseCase {
    pub fn new(
        store: Box<dyn ObjectStore>,
        lyrics: Box<dyn LyricSource>,
        recognizer: Box<dyn SpeechRecognizer>,
        settings: TranscriptionSettings,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            upload: UploadAudioUseCase::new(store),
            lyrics,
            recognize: RecognizeSpeechUseCase::new(recognizer, settings),
            logger,
        }
    }

    /// Returns the full result set after it has been written to `out`.
    pub fn execute(
        &mut self,
        audio_path: &Path,
        lyrics_path: &Path,
        out: &mut dyn Write,
    ) -> Result<Vec<RecognitionResult>, PipelineError> {
        let t = Instant::now();
        let object_name = self.upload.execute(audio_path)?;
        self.logger.timing("upload", elapsed_ms(t));

        let t = Instant::now();
        let segments = self.lyrics.load_segments(lyrics_path)?;
        let lines = flatten_lines(&segments);
        self.logger.timing("lyrics", elapsed_ms(t));
        self.logger.metric("lyric_segments", segments.len() as f64);
        self.logger.metric("lyric_lines", lines.len() as f64);
        if lines.is_empty() {
            log::warn!("No lyric lines in {}; recognizing without hints", lyrics_path.display());
        }

        let t = Instant::now();
        let results = self.recognize.execute(&object_name, lines)?;
        self.logger.timing("recognize", elapsed_ms(t));
        self.logger.metric("results", results.len() as f64);

        let t = Instant::now();
        let written = WordReporter::new(out)
            .report(&results)
            .map_err(PipelineError::Report)?;
        self.logger.timing("report", elapsed_ms(t));
        self.logger.metric("lines_written", written as f64);

        self.logger.info(&format!(
            "Transcribed {object_name}: {} results",
            results.len()
        ));
        self.logger.summary();
        Ok(results)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
