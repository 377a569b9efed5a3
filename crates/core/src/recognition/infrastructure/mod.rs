pub mod google_speech_recognizer;
