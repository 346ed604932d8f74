use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Condolence, NewCondolence},
    error::{AppError, Result},
    repository::CondolenceRepository,
};

#[derive(FromRow)]
struct CondolenceRow {
    id: String,
    funeral_id: String,
    author_name: String,
    author_email: Option<String>,
    author_location: Option<String>,
    message: String,
    is_approved: i32,
    created_at: NaiveDateTime,
}

pub struct SqliteCondolenceRepository {
    pool: SqlitePool,
}

impl SqliteCondolenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_condolence(row: CondolenceRow) -> Result<Condolence> {
        Ok(Condolence {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            funeral_id: Uuid::parse_str(&row.funeral_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            author_name: row.author_name,
            author_email: row.author_email,
            author_location: row.author_location,
            message: row.message,
            is_approved: row.is_approved != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl CondolenceRepository for SqliteCondolenceRepository {
    async fn create(&self, condolence: NewCondolence) -> Result<Condolence> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let funeral_id_str = condolence.funeral_id.to_string();
        let now = Utc::now().naive_utc();

        // is_approved is not taken from the submission; every condolence
        // starts unapproved and waits for moderation.
        sqlx::query(
            r#"
            INSERT INTO condolences (
                id, funeral_id, author_name, author_email, author_location,
                message, is_approved, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&funeral_id_str)
        .bind(&condolence.author_name)
        .bind(&condolence.author_email)
        .bind(&condolence.author_location)
        .bind(&condolence.message)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created condolence".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Condolence>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, CondolenceRow>(
            r#"
            SELECT id, funeral_id, author_name, author_email, author_location,
                   message, is_approved, created_at
            FROM condolences
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_condolence(r)?)),
            None => Ok(None),
        }
    }

    async fn list_approved_for_funeral(&self, funeral_id: Uuid) -> Result<Vec<Condolence>> {
        let funeral_id_str = funeral_id.to_string();
        let rows = sqlx::query_as::<_, CondolenceRow>(
            r#"
            SELECT id, funeral_id, author_name, author_email, author_location,
                   message, is_approved, created_at
            FROM condolences
            WHERE funeral_id = ? AND is_approved = 1
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(funeral_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_condolence).collect()
    }

    async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Condolence>> {
        let rows = sqlx::query_as::<_, CondolenceRow>(
            r#"
            SELECT id, funeral_id, author_name, author_email, author_location,
                   message, is_approved, created_at
            FROM condolences
            WHERE is_approved = 0
            ORDER BY created_at ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_condolence).collect()
    }

    async fn approve(&self, id: Uuid) -> Result<Condolence> {
        let id_str = id.to_string();

        let result = sqlx::query("UPDATE condolences SET is_approved = 1 WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Condolence not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve approved condolence".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM condolences WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Condolence not found".to_string()));
        }

        Ok(())
    }

    async fn count_pending(&self) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM condolences WHERE is_approved = 0")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0)
    }
}
