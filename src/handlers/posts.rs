use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::pagination::{self, Pagination};
use crate::app::AppState;
use crate::database::models::{CreatePostRequest, UpdatePostRequest};
use crate::database::PostStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query string carried by every owner-scoped endpoint
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid post id"))
}

/// GET /posts - Public paginated listing, newest items first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Value> {
    let (page, limit) = pagination::resolve(query.page, query.limit)?;

    let store = PostStore::new(state.db.clone());
    let (posts, total) = store.page(page, limit).await?;

    Ok(ApiResponse::success(json!({
        "posts": posts,
        "pagination": Pagination::new(total, page, limit),
    })))
}

/// GET /post/:id - Fetch a single post for the authenticated user.
///
/// An unknown id answers `{post: null}` rather than 404; the original wire
/// contract has no existence check here and clients rely on it.
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    auth.authorize_email(query.email.as_deref())?;
    let id = parse_post_id(&id)?;

    let store = PostStore::new(state.db.clone());
    let post = store.find_by_id(id).await?;

    Ok(ApiResponse::success(json!({ "post": post })))
}

/// GET /my-posts - All posts owned by the authenticated email, newest first
pub async fn my_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    if let Some(email) = query.email.as_deref() {
        auth.authorize_email(Some(email))?;
    }

    let store = PostStore::new(state.db.clone());
    let posts = store.list_for_owner(&auth.email).await?;

    Ok(ApiResponse::success(json!({ "posts": posts })))
}

/// POST /posts - Create a listing owned by the authenticated email
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Value> {
    auth.authorize_email(query.email.as_deref())?;
    if let Some(body_email) = payload.email.as_deref() {
        auth.authorize_email(Some(body_email))?;
    }

    let new_post = payload.into_new_post(&auth.email)?;

    let store = PostStore::new(state.db.clone());
    let post = store.insert(new_post).await?;

    Ok(ApiResponse::created(json!({ "post": post })))
}

/// PATCH /update-post/:id - Apply whitelisted field changes to an owned post
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Value> {
    auth.authorize_email(query.email.as_deref())?;
    let id = parse_post_id(&id)?;

    let store = PostStore::new(state.db.clone());
    let post = store
        .find_owned(id, &auth.email)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let changes = payload.normalize()?.diff(&post);
    if changes.is_empty() {
        // The post matched but nothing would change; distinct from the 404
        return Err(ApiError::bad_request("No changes were made to the post"));
    }

    let updated = store
        .apply_changes(id, &auth.email, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(json!({ "post": updated })))
}

/// DELETE /posts/:id - Remove an owned post
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Value> {
    auth.authorize_email(query.email.as_deref())?;
    let id = parse_post_id(&id)?;

    let store = PostStore::new(state.db.clone());
    let post = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    // The stored owner is checked as well, so a stale or forged id cannot
    // remove someone else's post.
    auth.authorize_email(Some(&post.email))?;

    let removed = store.delete(id, &auth.email).await?;
    if removed == 0 {
        return Err(ApiError::internal_server_error("Failed to delete post"));
    }

    Ok(ApiResponse::success(json!({
        "message": "Post deleted successfully"
    })))
}
