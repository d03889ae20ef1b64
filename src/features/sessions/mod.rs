pub mod models;
pub mod services;
pub mod stores;
pub mod workers;

pub use services::SessionManager;
pub use stores::{MemorySessionStore, PgSessionStore, SessionStore};
pub use workers::SessionSweeper;
