use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// Immutable event linking a post to the identity that reported it
/// found/returned. The `recoveredBy` and `originalPost` payloads are stored
/// as the client sent them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRecord {
    pub id: Uuid,
    /// Reference to the recovered post, not an ownership link
    pub post_id: Uuid,
    pub recovered_by: Value,
    pub original_post: Value,
    pub recovery_date: DateTime<Utc>,
}

/// Validated insert payload for a recovery event
#[derive(Debug, Clone)]
pub struct NewRecovery {
    pub post_id: Uuid,
    pub recovered_by: Value,
    pub original_post: Value,
    pub recovery_date: DateTime<Utc>,
}

/// Incoming body for `POST /recover-item`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverItemRequest {
    pub post_id: Option<String>,
    pub recovered_by: Option<Value>,
    pub original_post: Option<Value>,
    pub recovery_date: Option<DateTime<Utc>>,
}

impl RecoverItemRequest {
    pub fn into_new_recovery(self) -> Result<NewRecovery, ApiError> {
        let raw_id = self
            .post_id
            .ok_or_else(|| ApiError::bad_request("postId is required"))?;
        let post_id = Uuid::parse_str(raw_id.trim())
            .map_err(|_| ApiError::bad_request("Invalid post id"))?;

        Ok(NewRecovery {
            post_id,
            recovered_by: self.recovered_by.unwrap_or_else(|| json!({})),
            original_post: self.original_post.unwrap_or_else(|| json!({})),
            recovery_date: self.recovery_date.unwrap_or_else(Utc::now),
        })
    }
}
