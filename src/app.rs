use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database;
use crate::handlers::{posts, recovery, session};
use crate::middleware::{require_auth, ApiResponse};

/// Shared application state threaded through every handler and the auth
/// middleware; nothing else is global.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/post/:id", get(posts::get_one))
        .route("/my-posts", get(posts::my_posts))
        .route("/posts", post(posts::create))
        .route("/update-post/:id", patch(posts::update))
        .route("/posts/:id", delete(posts::remove))
        .route("/recover-item", post(recovery::recover_item))
        .route("/recovered-items", get(recovery::recovered_items))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/posts", get(posts::list))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout));

    public
        .merge(protected)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the browser clients named in config. Cookie auth
/// rules out a wildcard origin.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn root() -> ApiResponse<Value> {
    let version = env!("CARGO_PKG_VERSION");

    ApiResponse::success(json!({
        "name": "Lost and Found API",
        "version": version,
        "endpoints": {
            "posts": "GET /posts?page=&limit= (public)",
            "post": "GET /post/:id?email= (auth)",
            "my_posts": "GET /my-posts?email= (auth)",
            "create": "POST /posts?email= (auth)",
            "update": "PATCH /update-post/:id?email= (auth)",
            "delete": "DELETE /posts/:id?email= (auth)",
            "recover": "POST /recover-item?email= (auth)",
            "recovered_items": "GET /recovered-items?email= (auth)",
            "session": "POST /login, POST /logout (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "database unavailable",
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
