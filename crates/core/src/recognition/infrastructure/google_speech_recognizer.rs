use std::sync::Arc;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::recognition::domain::recognition_request::RecognitionRequest;
use crate::recognition::domain::speech_recognizer::{
    OperationHandle, OperationStatus, RecognitionError, SpeechRecognizer,
};
use crate::recognition::domain::transcript::{
    RecognitionAlternative, RecognitionResult, TranscriptWord,
};
use crate::shared::constants::SPEECH_API_BASE;
use crate::shared::credentials::TokenSource;

/// Speech recognizer backed by the Google Cloud Speech-to-Text REST API.
///
/// Jobs are submitted to `speech:longrunningrecognize` and polled through the
/// `operations` resource.
pub struct GoogleSpeechRecognizer {
    tokens: Arc<dyn TokenSource>,
    client: Client,
    api_base: String,
}

impl GoogleSpeechRecognizer {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            tokens,
            client: Client::new(),
            api_base: SPEECH_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn submit_url(&self) -> String {
        format!("{}/speech:longrunningrecognize", self.api_base)
    }

    fn operation_url(&self, operation: &OperationHandle) -> String {
        format!("{}/operations/{}", self.api_base, operation.name)
    }
}

impl SpeechRecognizer for GoogleSpeechRecognizer {
    fn start(&self, request: &RecognitionRequest) -> Result<OperationHandle, RecognitionError> {
        let token = self.tokens.access_token()?;
        let response = self
            .client
            .post(self.submit_url())
            .bearer_auth(token)
            .json(request)
            .send()
            .map_err(|e| RecognitionError::Transport {
                operation: "recognition submit",
                source: e,
            })?;
        let operation: WireOperation = read_json(response, "recognition submit")?;
        Ok(OperationHandle {
            name: operation.name,
        })
    }

    fn poll(&self, operation: &OperationHandle) -> Result<OperationStatus, RecognitionError> {
        let token = self.tokens.access_token()?;
        let response = self
            .client
            .get(self.operation_url(operation))
            .bearer_auth(token)
            .send()
            .map_err(|e| RecognitionError::Transport {
                operation: "operation poll",
                source: e,
            })?;
        let wire: WireOperation = read_json(response, "operation poll")?;
        wire.into_status()
    }
}

fn read_json<T: DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> Result<T, RecognitionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RecognitionError::Status {
            operation,
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }
    response
        .json()
        .map_err(|e| RecognitionError::Transport {
            operation,
            source: e,
        })
}

// ─── Wire format ───

#[derive(Debug, Deserialize)]
struct WireOperation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    metadata: Option<WireMetadata>,
    #[serde(default)]
    response: Option<WireResponse>,
    #[serde(default)]
    error: Option<WireStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    #[serde(default)]
    progress_percent: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    #[serde(default)]
    alternatives: Vec<WireAlternative>,
    #[serde(default)]
    language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    words: Vec<WireWord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWord {
    word: String,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

impl WireOperation {
    fn into_status(self) -> Result<OperationStatus, RecognitionError> {
        if let Some(error) = self.error {
            return Err(RecognitionError::Operation {
                code: error.code,
                message: error.message,
            });
        }
        if !self.done {
            return Ok(OperationStatus::Running {
                progress_percent: self.metadata.and_then(|m| m.progress_percent),
            });
        }
        let results = self
            .response
            .map(|r| r.results)
            .unwrap_or_default()
            .into_iter()
            .map(WireResult::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OperationStatus::Done(results))
    }
}

impl WireResult {
    fn into_domain(self) -> Result<RecognitionResult, RecognitionError> {
        let alternatives = self
            .alternatives
            .into_iter()
            .map(|alt| -> Result<RecognitionAlternative, RecognitionError> {
                let words = alt
                    .words
                    .into_iter()
                    .map(|w| -> Result<TranscriptWord, RecognitionError> {
                        Ok(TranscriptWord {
                            start_time: parse_offset(w.start_time.as_deref())?,
                            end_time: parse_offset(w.end_time.as_deref())?,
                            word: w.word,
                        })
                    })
                    .collect::<Result<Vec<_>, RecognitionError>>()?;
                Ok(RecognitionAlternative {
                    transcript: alt.transcript,
                    confidence: alt.confidence,
                    words,
                })
            })
            .collect::<Result<Vec<_>, RecognitionError>>()?;
        Ok(RecognitionResult {
            alternatives,
            language_code: self.language_code,
        })
    }
}

/// Parse a protobuf JSON duration such as `"1.300s"` into seconds. Absent offsets are zero.
fn parse_offset(value: Option<&str>) -> Result<f64, RecognitionError> {
    let Some(value) = value else {
        return Ok(0.0);
    };
    value
        .strip_suffix('s')
        .and_then(|secs| secs.parse::<f64>().ok())
        .ok_or_else(|| RecognitionError::Malformed(format!("invalid time offset '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::credentials::StaticTokenSource;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn recognizer() -> GoogleSpeechRecognizer {
        GoogleSpeechRecognizer::new(Arc::new(StaticTokenSource("token".to_string())))
    }

    fn parse(json: &str) -> Result<OperationStatus, RecognitionError> {
        serde_json::from_str::<WireOperation>(json)
            .unwrap()
            .into_status()
    }

    #[test]
    fn test_urls() {
        let r = recognizer();
        assert_eq!(
            r.submit_url(),
            "https://speech.googleapis.com/v1p1beta1/speech:longrunningrecognize"
        );
        let handle = OperationHandle {
            name: "4567".to_string(),
        };
        assert_eq!(
            r.operation_url(&handle),
            "https://speech.googleapis.com/v1p1beta1/operations/4567"
        );
    }

    #[test]
    fn test_with_api_base() {
        let r = recognizer().with_api_base("http://localhost:8080/v1/");
        assert_eq!(r.submit_url(), "http://localhost:8080/v1/speech:longrunningrecognize");
    }

    #[test]
    fn test_submitted_operation_is_running() {
        let status = parse(r#"{"name": "4567"}"#).unwrap();
        assert_eq!(
            status,
            OperationStatus::Running {
                progress_percent: None
            }
        );
    }

    #[test]
    fn test_running_operation_reports_progress() {
        let status = parse(
            r#"{"name": "4567", "metadata": {"@type": "x", "progressPercent": 42}, "done": false}"#,
        )
        .unwrap();
        assert_eq!(
            status,
            OperationStatus::Running {
                progress_percent: Some(42)
            }
        );
    }

    #[test]
    fn test_done_operation_maps_results() {
        let status = parse(
            r#"{
                "name": "4567",
                "done": true,
                "response": {
                    "@type": "type.googleapis.com/google.cloud.speech.v1p1beta1.LongRunningRecognizeResponse",
                    "results": [{
                        "alternatives": [{
                            "transcript": "hello world",
                            "confidence": 0.92,
                            "words": [
                                {"startTime": "0s", "endTime": "0.400s", "word": "hello"},
                                {"startTime": "0.400s", "endTime": "1.100s", "word": "world"}
                            ]
                        }],
                        "languageCode": "en-us"
                    }]
                }
            }"#,
        )
        .unwrap();

        let OperationStatus::Done(results) = status else {
            panic!("expected a finished operation");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].language_code.as_deref(), Some("en-us"));
        let best = results[0].best_alternative().unwrap();
        assert_eq!(best.transcript, "hello world");
        assert_eq!(best.words.len(), 2);
        assert_eq!(best.words[1].word, "world");
        assert_relative_eq!(best.words[1].start_time, 0.4);
        assert_relative_eq!(best.words[1].end_time, 1.1);
    }

    #[test]
    fn test_done_without_results_is_empty() {
        let status = parse(r#"{"name": "4567", "done": true, "response": {}}"#).unwrap();
        assert_eq!(status, OperationStatus::Done(vec![]));
    }

    #[test]
    fn test_operation_error() {
        let result = parse(
            r#"{"name": "4567", "done": true, "error": {"code": 3, "message": "bad sample rate"}}"#,
        );
        match result {
            Err(RecognitionError::Operation { code, message }) => {
                assert_eq!(code, 3);
                assert_eq!(message, "bad sample rate");
            }
            other => panic!("expected operation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::zero(Some("0s"), 0.0)]
    #[case::fraction(Some("1.300s"), 1.3)]
    #[case::whole(Some("12s"), 12.0)]
    #[case::absent(None, 0.0)]
    fn test_parse_offset(#[case] value: Option<&str>, #[case] expected: f64) {
        assert_relative_eq!(parse_offset(value).unwrap(), expected);
    }

    #[rstest]
    #[case::no_suffix("1.3")]
    #[case::not_a_number("abcs")]
    fn test_parse_offset_rejects(#[case] value: &str) {
        assert!(matches!(
            parse_offset(Some(value)),
            Err(RecognitionError::Malformed(_))
        ));
    }
}
