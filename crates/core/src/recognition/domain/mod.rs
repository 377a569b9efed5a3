pub mod recognition_request;
pub mod speech_recognizer;
pub mod transcript;
