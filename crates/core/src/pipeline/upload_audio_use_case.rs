use std::path::Path;

use crate::storage::domain::object_store::{object_name_for, ObjectStore, StorageError};

/// Ensures a local audio file is present in the bucket under its base filename.
pub struct UploadAudioUseCase {
    store: Box<dyn ObjectStore>,
}

impl UploadAudioUseCase {
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Returns the object name. The upload is skipped when the object already exists.
    pub fn execute(&self, audio_path: &Path) -> Result<String, StorageError> {
        let object_name = object_name_for(audio_path)?;
        if self.store.exists(&object_name)? {
            log::info!("{object_name} already in storage bucket, skipping upload");
        } else {
            log::info!("Uploading {} to storage bucket", audio_path.display());
            self.store.upload(&object_name, audio_path)?;
        }
        Ok(object_name)
    }
}
