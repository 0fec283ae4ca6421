use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub mod models;
pub mod posts;
pub mod recoveries;

pub use posts::PostStore;
pub use recoveries::{RecoveryOutcome, RecoveryStore};

/// Build the connection pool without touching the network; connections are
/// opened on first use, bounded by the configured acquire timeout.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy(&config.url)
}

/// Idempotent bootstrap of the two collections and their lookup indexes
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT NOT NULL,
        category TEXT NOT NULL,
        thumbnail TEXT NOT NULL,
        post_type TEXT NOT NULL,
        date DATE,
        status TEXT,
        email TEXT NOT NULL,
        name TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS recovered_items (
        id UUID PRIMARY KEY,
        post_id UUID NOT NULL,
        recovered_by JSONB NOT NULL,
        original_post JSONB NOT NULL,
        recovery_date TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS posts_email_idx ON posts (email)",
    "CREATE INDEX IF NOT EXISTS posts_date_idx ON posts (date DESC)",
    "CREATE INDEX IF NOT EXISTS recovered_items_recovered_by_email_idx
        ON recovered_items ((recovered_by->>'email'))",
    "CREATE INDEX IF NOT EXISTS recovered_items_original_post_email_idx
        ON recovered_items ((original_post->>'email'))",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Pings the store to confirm connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
