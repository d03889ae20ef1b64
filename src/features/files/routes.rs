use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::files::handlers::upload_file;
use crate::features::files::services::FileService;

/// Headroom for multipart boundaries and the text fields
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>) -> Router {
    let body_limit = file_service.max_file_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(file_service)
}
