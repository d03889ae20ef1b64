//! Dashboard data for the signed-in user.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/user/info` | Profile with file count and total bytes stored |
//! | GET | `/api/user/files` | 50 most recent uploads, newest first |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::UserService;
