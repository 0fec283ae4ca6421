use std::sync::Arc;

use lostfound_api::app::{app, AppState};
use lostfound_api::config::AppConfig;
use lostfound_api::database;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Lost and Found API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .unwrap_or_else(|e| panic!("invalid database configuration: {}", e));

    // Bootstrap the collections without holding up startup; requests that
    // need the store surface their own errors if it stays unavailable.
    {
        let pool = pool.clone();
        tokio::spawn(async move {
            match database::ensure_schema(&pool).await {
                Ok(_) => tracing::info!("Store collections ready"),
                Err(e) => tracing::warn!("Schema bootstrap skipped: {}", e),
            }
        });
    }

    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("LOSTFOUND_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Lost and Found API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
