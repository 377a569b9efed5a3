use std::thread;
use std::time::{Duration, Instant};

use crate::recognition::domain::recognition_request::RecognitionRequest;
use crate::recognition::domain::speech_recognizer::{
    OperationHandle, OperationStatus, RecognitionError, SpeechRecognizer,
};
use crate::recognition::domain::transcript::RecognitionResult;
use crate::shared::settings::TranscriptionSettings;

/// Submits a long-running recognition job for a stored object and blocks
/// until it finishes or the configured timeout elapses.
pub struct RecognizeSpeechUseCase {
    recognizer: Box<dyn SpeechRecognizer>,
    settings: TranscriptionSettings,
}

impl RecognizeSpeechUseCase {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, settings: TranscriptionSettings) -> Self {
        Self {
            recognizer,
            settings,
        }
    }

    pub fn execute(
        &self,
        object_name: &str,
        phrases: Vec<String>,
    ) -> Result<Vec<RecognitionResult>, RecognitionError> {
        let request = RecognitionRequest::for_stored_object(&self.settings, object_name, phrases);
        log::info!(
            "Getting speech recognition for {} ({} hint phrases)",
            request.audio.uri,
            request.phrase_count()
        );

        let operation = self.recognizer.start(&request)?;
        log::debug!("Submitted recognition operation {}", operation.name);

        wait_for_completion(
            self.recognizer.as_ref(),
            &operation,
            self.settings.timeout,
            self.settings.poll_interval,
        )
    }
}

/// Poll `operation` until it is done or `timeout` has passed.
///
/// The operation is polled at least once. Nothing is salvaged on timeout.
pub fn wait_for_completion(
    recognizer: &dyn SpeechRecognizer,
    operation: &OperationHandle,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Vec<RecognitionResult>, RecognitionError> {
    let deadline = Instant::now() + timeout;
    loop {
        match recognizer.poll(operation)? {
            OperationStatus::Done(results) => {
                log::debug!("Operation {} finished with {} results", operation.name, results.len());
                return Ok(results);
            }
            OperationStatus::Running { progress_percent } => {
                if let Some(pct) = progress_percent {
                    log::debug!("Operation {} at {pct}%", operation.name);
                }
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(RecognitionError::Timeout {
                operation: operation.name.clone(),
                timeout,
            });
        }
        thread::sleep(poll_interval.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::domain::transcript::{RecognitionAlternative, TranscriptWord};
    use std::sync::{Arc, Mutex};

    // ─── Stubs ───

    /// Reports `Running` for the first `polls_until_done` polls, then `Done`.
    /// `None` never finishes.
    struct ScriptedRecognizer {
        polls_until_done: Option<usize>,
        results: Vec<RecognitionResult>,
        submitted: Arc<Mutex<Vec<RecognitionRequest>>>,
        polls: Arc<Mutex<usize>>,
    }

    impl ScriptedRecognizer {
        fn new(polls_until_done: Option<usize>) -> Self {
            Self {
                polls_until_done,
                results: vec![one_word_result("hello")],
                submitted: Arc::new(Mutex::new(Vec::new())),
                polls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn start(&self, request: &RecognitionRequest) -> Result<OperationHandle, RecognitionError> {
            self.submitted.lock().unwrap().push(request.clone());
            Ok(OperationHandle {
                name: "op-1".to_string(),
            })
        }

        fn poll(&self, _: &OperationHandle) -> Result<OperationStatus, RecognitionError> {
            let mut polls = self.polls.lock().unwrap();
            *polls += 1;
            match self.polls_until_done {
                Some(n) if *polls > n => Ok(OperationStatus::Done(self.results.clone())),
                _ => Ok(OperationStatus::Running {
                    progress_percent: Some(50),
                }),
            }
        }
    }

    struct FailedOperationRecognizer;

    impl SpeechRecognizer for FailedOperationRecognizer {
        fn start(&self, _: &RecognitionRequest) -> Result<OperationHandle, RecognitionError> {
            Ok(OperationHandle {
                name: "op-2".to_string(),
            })
        }

        fn poll(&self, _: &OperationHandle) -> Result<OperationStatus, RecognitionError> {
            Err(RecognitionError::Operation {
                code: 3,
                message: "audio_channel_count mismatch".to_string(),
            })
        }
    }

    fn one_word_result(word: &str) -> RecognitionResult {
        RecognitionResult {
            alternatives: vec![RecognitionAlternative {
                transcript: word.to_string(),
                confidence: 0.9,
                words: vec![TranscriptWord {
                    word: word.to_string(),
                    start_time: 0.0,
                    end_time: 0.5,
                }],
            }],
            language_code: None,
        }
    }

    fn fast_settings(timeout_ms: u64) -> TranscriptionSettings {
        TranscriptionSettings {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_carries_object_uri_and_phrases() {
        let recognizer = ScriptedRecognizer::new(Some(0));
        let submitted = recognizer.submitted.clone();
        let uc = RecognizeSpeechUseCase::new(Box::new(recognizer), fast_settings(1000));

        uc.execute("vocals_mono.wav", vec!["hello".to_string(), "world".to_string()])
            .unwrap();

        let submitted = submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            submitted[0].audio.uri,
            "gs://wordist-productions/vocals_mono.wav"
        );
        assert_eq!(
            submitted[0].config.speech_contexts[0].phrases,
            vec!["hello", "world"]
        );
    }

    #[test]
    fn test_waits_until_done() {
        let recognizer = ScriptedRecognizer::new(Some(3));
        let polls = recognizer.polls.clone();
        let uc = RecognizeSpeechUseCase::new(Box::new(recognizer), fast_settings(5_000));

        let results = uc.execute("vocals_mono.wav", vec![]).unwrap();
        assert_eq!(results, vec![one_word_result("hello")]);
        assert_eq!(*polls.lock().unwrap(), 4);
    }

    #[test]
    fn test_timeout_fails_without_results() {
        let recognizer = ScriptedRecognizer::new(None);
        let polls = recognizer.polls.clone();
        let uc = RecognizeSpeechUseCase::new(Box::new(recognizer), fast_settings(20));

        let result = uc.execute("vocals_mono.wav", vec![]);
        match result {
            Err(RecognitionError::Timeout { operation, timeout }) => {
                assert_eq!(operation, "op-1");
                assert_eq!(timeout, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(*polls.lock().unwrap() >= 1);
    }

    #[test]
    fn test_zero_timeout_still_polls_once() {
        let recognizer = ScriptedRecognizer::new(Some(0));
        let uc = RecognizeSpeechUseCase::new(Box::new(recognizer), fast_settings(0));
        assert!(uc.execute("vocals_mono.wav", vec![]).is_ok());
    }

    #[test]
    fn test_operation_error_propagates() {
        let uc = RecognizeSpeechUseCase::new(Box::new(FailedOperationRecognizer), fast_settings(1000));
        let result = uc.execute("vocals_mono.wav", vec![]);
        assert!(matches!(
            result,
            Err(RecognitionError::Operation { code: 3, .. })
        ));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = RecognitionError::Timeout {
            operation: "op-1".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(
            err.to_string(),
            "recognition operation op-1 did not finish within 300s"
        );
    }
}
