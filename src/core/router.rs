use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;

use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, AuthService};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::sessions::SessionManager;
use crate::features::users::{routes as users_routes, UserService};

/// Service handles shared by the API routes
#[derive(Clone)]
pub struct AppServices {
    pub sessions: Arc<SessionManager>,
    pub auth: Arc<AuthService>,
    pub files: Arc<FileService>,
    pub users: Arc<UserService>,
}

/// JSON API routes. Upload and dashboard routes sit behind the session
/// middleware; account routes do not.
pub fn api_routes(services: AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(files_routes(services.files))
        .merge(users_routes(services.users))
        .route_layer(from_fn_with_state(
            services.sessions,
            middleware::session_middleware,
        ));

    let public_routes = Router::new().merge(auth_routes::routes(services.auth));

    Router::new().merge(protected_routes).merge(public_routes)
}
