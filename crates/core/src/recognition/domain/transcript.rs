use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TranscriptWord {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// One candidate transcription of a stretch of audio.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    pub transcript: String,
    pub confidence: f32,
    pub words: Vec<TranscriptWord>,
}

/// Alternatives for one stretch of audio, most likely first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub alternatives: Vec<RecognitionAlternative>,
    pub language_code: Option<String>,
}

impl RecognitionResult {
    pub fn best_alternative(&self) -> Option<&RecognitionAlternative> {
        self.alternatives.first()
    }
}
