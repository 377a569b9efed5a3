use serde::Serialize;

use crate::shared::settings::TranscriptionSettings;

/// Audio encoding sent with a request. `EncodingUnspecified` lets the
/// service read the format from the file header (WAV, FLAC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    EncodingUnspecified,
}

/// Phrases the recognizer should favour, weighted by `boost`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechContext {
    pub phrases: Vec<String>,
    pub boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_word_time_offsets: bool,
    pub speech_contexts: Vec<SpeechContext>,
    pub audio_channel_count: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionAudio {
    pub uri: String,
}

/// A long-running recognition job over audio already in storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

impl RecognitionRequest {
    /// Request for `object_name` in the configured bucket, with `phrases` as one boosted context.
    pub fn for_stored_object(
        settings: &TranscriptionSettings,
        object_name: &str,
        phrases: Vec<String>,
    ) -> Self {
        Self {
            config: RecognitionConfig {
                encoding: AudioEncoding::EncodingUnspecified,
                sample_rate_hertz: settings.sample_rate_hertz,
                language_code: settings.language_code.clone(),
                enable_word_time_offsets: true,
                speech_contexts: vec![SpeechContext {
                    phrases,
                    boost: settings.phrase_boost,
                }],
                audio_channel_count: settings.audio_channel_count,
            },
            audio: RecognitionAudio {
                uri: settings.storage_uri(object_name),
            },
        }
    }

    pub fn phrase_count(&self) -> usize {
        self.config
            .speech_contexts
            .iter()
            .map(|c| c.phrases.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RecognitionRequest {
        RecognitionRequest::for_stored_object(
            &TranscriptionSettings::default(),
            "vocals_mono.wav",
            vec!["hello".to_string(), "world".to_string()],
        )
    }

    #[test]
    fn test_request_uses_fixed_config() {
        let r = request();
        assert_eq!(r.audio.uri, "gs://wordist-productions/vocals_mono.wav");
        assert_eq!(r.config.encoding, AudioEncoding::EncodingUnspecified);
        assert_eq!(r.config.sample_rate_hertz, 44100);
        assert_eq!(r.config.language_code, "en-US");
        assert_eq!(r.config.audio_channel_count, 1);
        assert!(r.config.enable_word_time_offsets);
        assert_eq!(r.config.speech_contexts.len(), 1);
        assert_eq!(r.config.speech_contexts[0].boost, 20.0);
        assert_eq!(r.phrase_count(), 2);
    }

    #[test]
    fn test_request_wire_shape() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(
            value,
            json!({
                "config": {
                    "encoding": "ENCODING_UNSPECIFIED",
                    "sampleRateHertz": 44100,
                    "languageCode": "en-US",
                    "enableWordTimeOffsets": true,
                    "speechContexts": [{ "phrases": ["hello", "world"], "boost": 20.0 }],
                    "audioChannelCount": 1
                },
                "audio": { "uri": "gs://wordist-productions/vocals_mono.wav" }
            })
        );
    }

    #[test]
    fn test_stereo_settings_flow_into_config() {
        let settings = TranscriptionSettings {
            audio_channel_count: 2,
            ..Default::default()
        };
        let r = RecognitionRequest::for_stored_object(&settings, "vocals_stereo.wav", vec![]);
        assert_eq!(r.config.audio_channel_count, 2);
        assert_eq!(r.phrase_count(), 0);
    }

    #[test]
    fn test_unspecified_encoding_wire_name() {
        assert_eq!(
            serde_json::to_value(AudioEncoding::EncodingUnspecified).unwrap(),
            json!("ENCODING_UNSPECIFIED")
        );
    }
}
