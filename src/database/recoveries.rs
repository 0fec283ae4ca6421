use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::post::STATUS_RECOVERED;
use crate::database::models::{NewRecovery, RecoveryRecord};

/// Direct access to the `recovered_items` collection
pub struct RecoveryStore {
    pool: PgPool,
}

/// Result of a recovery attempt
#[derive(Debug)]
pub enum RecoveryOutcome {
    Recorded(RecoveryRecord),
    PostMissing,
    AlreadyRecovered,
}

impl RecoveryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a recovery event and flip the referenced post's status, both
    /// inside one transaction. A post that is missing or already recovered
    /// rolls everything back, so the record and the status flip always land
    /// together.
    pub async fn record_recovery(
        &self,
        new: NewRecovery,
    ) -> Result<RecoveryOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let status: Option<Option<String>> =
            sqlx::query_scalar("SELECT status FROM posts WHERE id = $1 FOR UPDATE")
                .bind(new.post_id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            None => {
                tx.rollback().await?;
                return Ok(RecoveryOutcome::PostMissing);
            }
            Some(Some(_)) => {
                tx.rollback().await?;
                return Ok(RecoveryOutcome::AlreadyRecovered);
            }
            Some(None) => {}
        }

        let record = sqlx::query_as::<_, RecoveryRecord>(
            "INSERT INTO recovered_items
                (id, post_id, recovered_by, original_post, recovery_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.post_id)
        .bind(&new.recovered_by)
        .bind(&new.original_post)
        .bind(new.recovery_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET status = $1 WHERE id = $2")
            .bind(STATUS_RECOVERED)
            .bind(new.post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RecoveryOutcome::Recorded(record))
    }

    /// Recovery records where the email is either the recoverer or the
    /// original poster, newest first
    pub async fn list_for_email(&self, email: &str) -> Result<Vec<RecoveryRecord>, sqlx::Error> {
        sqlx::query_as::<_, RecoveryRecord>(
            "SELECT * FROM recovered_items
             WHERE recovered_by->>'email' = $1 OR original_post->>'email' = $1
             ORDER BY recovery_date DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }
}
