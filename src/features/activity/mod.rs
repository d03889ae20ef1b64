pub mod models;
pub mod services;
pub mod workers;

pub use models::ActivityEvent;
pub use services::ActivityLogger;
pub use workers::ActivityLogWorker;
