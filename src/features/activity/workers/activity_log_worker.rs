use sqlx::PgPool;
use tokio::sync::mpsc::Receiver;

use crate::core::error::Result;
use crate::features::activity::models::ActivityEvent;

/// Drains queued audit events into `activity_logs`
pub struct ActivityLogWorker {
    pool: PgPool,
    rx: Receiver<ActivityEvent>,
}

impl ActivityLogWorker {
    pub fn new(pool: PgPool, rx: Receiver<ActivityEvent>) -> Self {
        Self { pool, rx }
    }

    /// Run until every sender has been dropped
    pub async fn run(mut self) {
        tracing::info!("Starting activity log worker");

        while let Some(event) = self.rx.recv().await {
            if let Err(e) = self.persist(&event).await {
                tracing::warn!("Failed to write '{}' activity log: {:?}", event.action, e);
            }
        }

        tracing::info!("Activity log worker stopped");
    }

    async fn persist(&self, event: &ActivityEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, details, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.user_id)
        .bind(event.action)
        .bind(&event.details)
        .bind(event.ip_address.as_deref())
        .bind(event.user_agent.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
