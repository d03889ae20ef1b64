mod activity_log_worker;

pub use activity_log_worker::ActivityLogWorker;
