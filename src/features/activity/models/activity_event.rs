use serde_json::Value;
use uuid::Uuid;

/// Audit event queued for the `activity_logs` table
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub user_id: Option<Uuid>,
    pub action: &'static str,
    pub details: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ActivityEvent {
    pub fn new(action: &'static str, user_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            action,
            details: Value::Null,
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}
