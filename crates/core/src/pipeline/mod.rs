pub mod pipeline_logger;
pub mod recognize_speech_use_case;
pub mod transcribe_song_use_case;
pub mod upload_audio_use_case;
