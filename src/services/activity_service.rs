use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::database::collection::Collection;
use crate::database::store::DocumentStore;
use crate::models::activity_log::{self, ActivityLog};
use crate::utils::request_meta::ClientInfo;

#[derive(Clone)]
pub struct ActivityService {
    logs: Collection<ActivityLog>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            logs: Collection::new(store, activity_log::COLLECTION),
        }
    }

    /// Appends an audit entry; a failed write is only logged.
    pub async fn log(
        &self,
        actor: Option<&str>,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        details: Option<JsonValue>,
        client: &ClientInfo,
    ) {
        let entry = ActivityLog {
            actor: actor.map(str::to_string),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            details,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        };
        if let Err(e) = self.logs.insert(&entry).await {
            tracing::warn!(error = %e, action, entity_type, entity_id, "activity log write failed");
        }
    }
}
