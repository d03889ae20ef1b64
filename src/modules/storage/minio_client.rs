//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 without `fail-on-err`, so non-2xx responses come back as
//! `Ok` and are classified here by status code.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::object_storage::{FileVisibility, ObjectStorage};
use crate::core::config::MinIOConfig;
use crate::core::error::{AppError, Result};

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    private_prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration.
    ///
    /// The anonymous-read policy for the public prefix is provisioned
    /// alongside the bucket, not by this service.
    pub fn new(config: MinIOConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}, private_prefix: {}",
            config.endpoint, config.bucket, config.public_prefix, config.private_prefix
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
            private_prefix: config.private_prefix,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<()> {
        let response = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match response {
            Ok(created) if created.success() => {
                info!("Bucket '{}' created successfully", self.bucket.name());
            }
            Ok(created) if created.response_code == 409 => {
                debug!("Bucket '{}' already exists", self.bucket.name());
            }
            Ok(created) => {
                // Credentials may lack CreateBucket while still being able to write
                warn!(
                    "Could not create bucket '{}' (HTTP {}): {}. Assuming it exists.",
                    self.bucket.name(),
                    created.response_code,
                    created.response_text
                );
            }
            Err(e) => {
                return Err(AppError::StorageUnavailable(format!(
                    "Failed to reach bucket '{}': {}",
                    self.bucket.name(),
                    e
                )));
            }
        }

        Ok(())
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// URL for a stored key. Public keys use the public endpoint.
    pub fn get_file_url(&self, key: &str) -> String {
        let endpoint = if key.starts_with(&format!("{}/", self.public_prefix)) {
            &self.public_endpoint
        } else {
            &self.endpoint
        };
        format!("{}/{}/{}", endpoint, self.bucket.name(), key)
    }

    fn prefix(&self, visibility: FileVisibility) -> &str {
        match visibility {
            FileVisibility::Public => &self.public_prefix,
            FileVisibility::Private => &self.private_prefix,
        }
    }
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    fn object_key(&self, visibility: FileVisibility, path: &str) -> String {
        format!("{}/{}", self.prefix(visibility), path)
    }

    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("Failed to upload file '{}': {}", key, e))
            })?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(classify_put_failure(
                key,
                status,
                response.as_str().unwrap_or_default(),
            ));
        }

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());
        Ok(self.get_file_url(key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let response = self.bucket.delete_object(key).await.map_err(|e| {
            AppError::StorageUnavailable(format!("Failed to delete file '{}': {}", key, e))
        })?;

        let status = response.status_code();
        if !(200..300).contains(&status) && status != 404 {
            return Err(AppError::StorageUnavailable(format!(
                "Failed to delete file '{}': HTTP {}",
                key, status
            )));
        }

        debug!(
            "Deleted file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}

/// Map a rejected PUT to the storage error it represents
fn classify_put_failure(key: &str, status: u16, body: &str) -> AppError {
    let quota = status == 507
        || body.contains("<Code>QuotaExceeded</Code>")
        || body.contains("<Code>EntityTooLarge</Code>");

    if quota {
        AppError::QuotaExceeded(format!(
            "Storage refused '{}' (HTTP {}): quota or size limit reached",
            key, status
        ))
    } else {
        AppError::StorageUnavailable(format!("Failed to upload file '{}': HTTP {}", key, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MinIOConfig {
        MinIOConfig {
            endpoint: "http://minio:9000".to_string(),
            public_endpoint: "https://cdn.example.com".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "saas-uploads".to_string(),
            region: "us-east-1".to_string(),
            public_prefix: "public".to_string(),
            private_prefix: "private".to_string(),
        }
    }

    #[test]
    fn test_object_key_uses_visibility_prefix() {
        let client = MinIOClient::new(config()).unwrap();
        assert_eq!(
            client.object_key(FileVisibility::Public, "uploads/u1/a.txt"),
            "public/uploads/u1/a.txt"
        );
        assert_eq!(
            client.object_key(FileVisibility::Private, "uploads/u1/a.txt"),
            "private/uploads/u1/a.txt"
        );
    }

    #[test]
    fn test_file_url_by_visibility() {
        let client = MinIOClient::new(config()).unwrap();
        assert_eq!(
            client.get_file_url("public/uploads/u1/a.txt"),
            "https://cdn.example.com/saas-uploads/public/uploads/u1/a.txt"
        );
        assert_eq!(
            client.get_file_url("private/uploads/u1/a.txt"),
            "http://minio:9000/saas-uploads/private/uploads/u1/a.txt"
        );
        // Only a whole path segment counts as the public prefix
        assert_eq!(
            client.get_file_url("publicity/a.txt"),
            "http://minio:9000/saas-uploads/publicity/a.txt"
        );
    }

    #[test]
    fn test_classify_quota_failures() {
        assert!(matches!(
            classify_put_failure("k", 507, ""),
            AppError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_put_failure("k", 400, "<Error><Code>EntityTooLarge</Code></Error>"),
            AppError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_put_failure("k", 403, "<Error><Code>QuotaExceeded</Code></Error>"),
            AppError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn test_classify_other_failures() {
        assert!(matches!(
            classify_put_failure("k", 403, "<Error><Code>AccessDenied</Code></Error>"),
            AppError::StorageUnavailable(_)
        ));
        assert!(matches!(
            classify_put_failure("k", 503, ""),
            AppError::StorageUnavailable(_)
        ));
    }
}
