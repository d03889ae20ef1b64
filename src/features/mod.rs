pub mod activity;
pub mod auth;
pub mod files;
pub mod sessions;
pub mod users;
