use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};

use crate::features::activity::models::ActivityEvent;

/// Fire-and-forget handle for recording audit events.
///
/// Recording never blocks and never fails the caller. When the buffer is
/// full or the worker is gone the event is dropped with a warning.
#[derive(Clone)]
pub struct ActivityLogger {
    tx: Sender<ActivityEvent>,
}

impl ActivityLogger {
    pub fn new(buffer: usize) -> (Self, Receiver<ActivityEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }

    pub fn record(&self, event: ActivityEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!("Activity log buffer full, dropping '{}' event", event.action);
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(
                    "Activity log worker stopped, dropping '{}' event",
                    event.action
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{ACTION_USER_LOGIN, ACTION_USER_REGISTERED};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_record_delivers_event() {
        let (logger, mut rx) = ActivityLogger::new(4);
        let user_id = Uuid::now_v7();

        logger.record(
            ActivityEvent::new(ACTION_USER_LOGIN, Some(user_id))
                .with_details(json!({"email": "alice@x.com"}))
                .with_client(Some("10.0.0.1".to_string()), None),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, ACTION_USER_LOGIN);
        assert_eq!(event.user_id, Some(user_id));
        assert_eq!(event.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_full_buffer_drops_without_blocking() {
        let (logger, mut rx) = ActivityLogger::new(1);

        logger.record(ActivityEvent::new(ACTION_USER_REGISTERED, None));
        logger.record(ActivityEvent::new(ACTION_USER_LOGIN, None));

        assert_eq!(rx.recv().await.unwrap().action, ACTION_USER_REGISTERED);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (logger, rx) = ActivityLogger::new(1);
        drop(rx);

        logger.record(ActivityEvent::new(ACTION_USER_LOGIN, None));
    }
}
