pub mod dtos;
pub mod handlers;
pub mod model;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgUserRepository, UserRepository};
pub use services::{AuthService, CredentialHasher};
