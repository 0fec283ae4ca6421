use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::api::pagination;
use crate::database::models::{NewPost, Post, PostChanges};

/// Direct access to the `posts` collection
pub struct PostStore {
    pool: PgPool,
}

impl PostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Total count plus one page of posts sorted by item date, newest first
    pub async fn page(&self, page: i64, limit: i64) -> Result<(Vec<Post>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts
             ORDER BY date DESC NULLS LAST, created_at DESC
             OFFSET $1 LIMIT $2",
        )
        .bind(pagination::offset(page, limit))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((posts, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch a post only when it exists AND belongs to the given owner
    pub async fn find_owned(&self, id: Uuid, email: &str) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1 AND email = $2")
            .bind(id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// All posts owned by the email, newest first
    pub async fn list_for_owner(&self, email: &str) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE email = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert(&self, new: NewPost) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts
                (id, title, description, location, category, thumbnail,
                 post_type, date, status, email, name, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.title)
        .bind(new.description)
        .bind(new.location)
        .bind(new.category)
        .bind(new.thumbnail)
        .bind(new.post_type)
        .bind(new.date)
        .bind(Option::<String>::None) // every post starts without a status
        .bind(new.email)
        .bind(new.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Apply the whitelisted field changes to the post matching id AND owner.
    /// Returns the refreshed document, or None when no row matched.
    ///
    /// `changes` must not be empty; callers reject no-op updates first.
    pub async fn apply_changes(
        &self,
        id: Uuid,
        email: &str,
        changes: &PostChanges,
    ) -> Result<Option<Post>, sqlx::Error> {
        debug_assert!(!changes.is_empty());

        let mut query = QueryBuilder::new("UPDATE posts SET ");
        let mut fields = query.separated(", ");
        if let Some(v) = &changes.title {
            fields.push("title = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.description {
            fields.push("description = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.location {
            fields.push("location = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.category {
            fields.push("category = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.thumbnail {
            fields.push("thumbnail = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = changes.date {
            fields.push("date = ").push_bind_unseparated(v);
        }
        if let Some(v) = &changes.post_type {
            fields.push("post_type = ").push_bind_unseparated(v.clone());
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND email = ")
            .push_bind(email.to_string())
            .push(" RETURNING *");

        query
            .build_query_as::<Post>()
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete conditioned on both id and owner email; returns removed rows
    pub async fn delete(&self, id: Uuid, email: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND email = $2")
            .bind(id)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
