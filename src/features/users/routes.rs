use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/user/info", get(handlers::get_user_info))
        .route("/api/user/files", get(handlers::list_user_files))
        .with_state(service)
}
