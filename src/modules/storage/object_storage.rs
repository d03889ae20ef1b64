use async_trait::async_trait;

use crate::core::error::Result;

/// Which prefix an object is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVisibility {
    /// Readable by anyone holding the URL
    Public,
    /// Not served anonymously
    Private,
}

impl FileVisibility {
    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            Self::Public
        } else {
            Self::Private
        }
    }
}

/// Storage gateway for uploaded objects.
///
/// A `store` either lands the whole object or fails; there are no partial
/// writes visible to callers.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Full object key for a path under the visibility prefix
    fn object_key(&self, visibility: FileVisibility, path: &str) -> String;

    /// Write an object and return the URL it is reachable at
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Delete an object. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
