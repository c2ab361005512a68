use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const COLLECTION: &str = "activity_logs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub actor: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Option<JsonValue>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
