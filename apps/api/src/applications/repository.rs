//! Reads and partial writes against the `applications` table.
//!
//! Every query is scoped by `user_id`, mirroring the row-level policy the
//! database applies to the identity token. Writes are independent partial
//! updates keyed by id: no version column, last write wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication};

/// A status write. Always stamps `last_status_update_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    /// Replaces `status_details` when present; otherwise the stored payload is kept.
    pub details: Option<Value>,
    pub stamped_at: DateTime<Utc>,
}

impl StatusUpdate {
    pub fn new(status: ApplicationStatus, details: Option<Value>, now: DateTime<Utc>) -> Self {
        Self {
            status,
            details,
            stamped_at: now,
        }
    }

    /// User-initiated withdrawal. Applies regardless of the current status,
    /// including terminal ones such as `REJECTED_BY_COMPANY`.
    pub fn withdrawal(now: DateTime<Utc>) -> Self {
        Self::new(ApplicationStatus::WithdrawnByUser, None, now)
    }
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// All applications for a user, newest `applied_at` first.
    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<&ApplicationStatus>,
    ) -> Result<Vec<ApplicationRow>, AppError>;

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;

    async fn create(&self, user_id: &str, new: &NewApplication)
        -> Result<ApplicationRow, AppError>;

    async fn update_status(
        &self,
        user_id: &str,
        id: Uuid,
        update: &StatusUpdate,
    ) -> Result<Option<ApplicationRow>, AppError>;

    async fn update_notes(
        &self,
        user_id: &str,
        id: Uuid,
        notes: &str,
    ) -> Result<Option<ApplicationRow>, AppError>;
}

pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<&ApplicationStatus>,
    ) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT * FROM applications
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY applied_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str().to_string()))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create(
        &self,
        user_id: &str,
        new: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        let status = new.status.clone().unwrap_or(ApplicationStatus::Draft);
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (id, user_id, job_title, company_name, job_url, adzuna_job_id,
                 skyvern_task_id, status, status_details, applied_at,
                 last_status_update_at, notes, resume_url_used,
                 cover_letter_url_used, application_source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, now()),
                    now(), $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.job_title)
        .bind(&new.company_name)
        .bind(&new.job_url)
        .bind(&new.adzuna_job_id)
        .bind(&new.skyvern_task_id)
        .bind(status.as_str())
        .bind(&new.status_details)
        .bind(new.applied_at)
        .bind(&new.notes)
        .bind(&new.resume_url_used)
        .bind(&new.cover_letter_url_used)
        .bind(&new.application_source)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_status(
        &self,
        user_id: &str,
        id: Uuid,
        update: &StatusUpdate,
    ) -> Result<Option<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET status = $1,
                status_details = COALESCE($2, status_details),
                last_status_update_at = $3,
                updated_at = now()
            WHERE id = $4 AND user_id = $5
            RETURNING *
            "#,
        )
        .bind(update.status.as_str())
        .bind(&update.details)
        .bind(update.stamped_at)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_notes(
        &self,
        user_id: &str,
        id: Uuid,
        notes: &str,
    ) -> Result<Option<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET notes = $1, updated_at = now()
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(notes)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
