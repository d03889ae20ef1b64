use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientInfo;
use crate::features::activity::{ActivityEvent, ActivityLogger};
use crate::features::files::models::{NewUploadedFile, UploadedFile};
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{FileVisibility, ObjectStorage};
use crate::shared::constants::{ACTION_FILE_UPLOADED, MAX_CONTENT_TYPE_LEN, UPLOADS_PATH};
use crate::shared::validation::sanitize_filename;

/// A file received from the client, fully buffered
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub data: Vec<u8>,
    pub original_name: String,
    pub content_type: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// Upload orchestration: object storage first, metadata second
pub struct FileService {
    files: Arc<dyn FileRepository>,
    storage: Arc<dyn ObjectStorage>,
    activity: ActivityLogger,
    max_file_size: usize,
}

impl FileService {
    pub fn new(
        files: Arc<dyn FileRepository>,
        storage: Arc<dyn ObjectStorage>,
        activity: ActivityLogger,
        max_file_size: usize,
    ) -> Self {
        Self {
            files,
            storage,
            activity,
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Store an upload and record its metadata.
    ///
    /// No metadata row is written unless storage confirmed the object. If the
    /// row cannot be written the object is deleted again; a failed delete
    /// leaves an orphan that is logged with its key.
    pub async fn upload(
        &self,
        user_id: Uuid,
        upload: FileUpload,
        client: ClientInfo,
    ) -> Result<UploadedFile> {
        if upload.data.is_empty() {
            return Err(AppError::Validation("No file uploaded".to_string()));
        }
        if upload.data.len() > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes",
                self.max_file_size
            )));
        }
        if upload.content_type.len() > MAX_CONTENT_TYPE_LEN {
            return Err(AppError::Validation(format!(
                "Content type must be at most {} characters",
                MAX_CONTENT_TYPE_LEN
            )));
        }

        let file_size = upload.data.len() as i64;
        let path = format!(
            "{}/{}/{}-{}",
            UPLOADS_PATH,
            user_id,
            Uuid::now_v7(),
            sanitize_filename(&upload.original_name)
        );
        let file_key = self
            .storage
            .object_key(FileVisibility::from_public_flag(upload.is_public), &path);

        let file_url = self
            .storage
            .store(&file_key, upload.data, &upload.content_type)
            .await?;
        debug!("File stored: {}", file_key);

        let new_file = NewUploadedFile {
            user_id,
            filename: upload.original_name,
            file_key: file_key.clone(),
            file_url,
            file_size,
            file_type: upload.content_type,
            description: upload.description,
            is_public: upload.is_public,
        };

        let file = match self.files.insert(new_file).await {
            Ok(file) => file,
            Err(e) => {
                self.discard_object(&file_key).await;
                return Err(e);
            }
        };

        info!(
            "File metadata saved: id={}, user={}, key={}, size={}",
            file.id, file.user_id, file.file_key, file.file_size
        );

        self.activity.record(
            ActivityEvent::new(ACTION_FILE_UPLOADED, Some(user_id))
                .with_details(json!({
                    "file_id": file.id,
                    "filename": file.filename,
                    "file_size": file.file_size,
                }))
                .with_client(client.ip_address, client.user_agent),
        );

        Ok(file)
    }

    async fn discard_object(&self, file_key: &str) {
        match self.storage.remove(file_key).await {
            Ok(()) => debug!("Removed object after failed metadata insert: {}", file_key),
            Err(e) => error!(
                "Orphaned object left in storage: key={}, error={:?}",
                file_key, e
            ),
        }
    }
}
