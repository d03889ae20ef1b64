use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::sessions::services::SessionManager;

/// Background worker that purges expired sessions on a fixed interval
pub struct SessionSweeper {
    sessions: Arc<SessionManager>,
    period: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<SessionManager>, period: Duration) -> Self {
        Self { sessions, period }
    }

    /// Run the sweeper in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting session sweeper worker (interval: {}s)",
            self.period.as_secs()
        );

        let mut interval = interval(self.period);

        loop {
            interval.tick().await;
            self.sweep().await;
        }
    }

    /// Single purge pass; errors are logged and the next tick retries
    pub async fn sweep(&self) -> u64 {
        match self.sessions.purge_expired().await {
            Ok(0) => 0,
            Ok(purged) => {
                tracing::info!("Purged {} expired sessions", purged);
                purged
            }
            Err(e) => {
                tracing::error!("Error purging expired sessions: {:?}", e);
                0
            }
        }
    }
}
