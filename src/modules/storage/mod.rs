//! Object storage for uploaded files
//!
//! `ObjectStorage` is the gateway the upload flow talks to; `MinIOClient` is
//! the S3-compatible implementation used in production.

mod minio_client;
mod object_storage;

pub use minio_client::MinIOClient;
pub use object_storage::{FileVisibility, ObjectStorage};
