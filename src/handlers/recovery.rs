use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::posts::OwnerQuery;
use crate::app::AppState;
use crate::database::models::RecoverItemRequest;
use crate::database::{RecoveryOutcome, RecoveryStore};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /recover-item - Record that a post was recovered.
///
/// The identity check covers the reporter (the authenticated caller), not
/// the recovered post's owner. The record insert and the post status flip
/// are committed together.
pub async fn recover_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<RecoverItemRequest>,
) -> ApiResult<Value> {
    auth.authorize_email(query.email.as_deref())?;

    let new_recovery = payload.into_new_recovery()?;

    let store = RecoveryStore::new(state.db.clone());
    match store.record_recovery(new_recovery).await? {
        RecoveryOutcome::Recorded(record) => {
            Ok(ApiResponse::success(json!({ "recoveredItem": record })))
        }
        RecoveryOutcome::PostMissing => Err(ApiError::not_found("Post not found")),
        RecoveryOutcome::AlreadyRecovered => {
            Err(ApiError::bad_request("Post has already been recovered"))
        }
    }
}

/// GET /recovered-items - Recovery records where the authenticated email is
/// either the recoverer or the original poster, newest first
pub async fn recovered_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    if let Some(email) = query.email.as_deref() {
        auth.authorize_email(Some(email))?;
    }

    let store = RecoveryStore::new(state.db.clone());
    let items = store.list_for_email(&auth.email).await?;

    Ok(ApiResponse::success(json!({ "recoveredItems": items })))
}
