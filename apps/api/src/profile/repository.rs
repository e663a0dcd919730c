//! `users` and `user_preferences` persistence.
//!
//! Upserts follow the backend's upsert contract: fields present in the payload
//! overwrite, omitted fields keep the stored value. Profile upserts cannot
//! clear a column; preference upserts can, by sending `null`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::profile::{
    patch_value, PreferencesUpsert, ProfileUpsert, UserPreferencesRow, UserProfileRow,
};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfileRow>, AppError>;

    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfileRow, AppError>;

    /// Sets `resume_url` back to null.
    async fn clear_resume(&self, user_id: &str) -> Result<(), AppError>;

    /// `None` when the user has no preferences row yet.
    async fn get_preferences(&self, user_id: &str)
        -> Result<Option<UserPreferencesRow>, AppError>;

    async fn upsert_preferences(
        &self,
        preferences: &PreferencesUpsert,
    ) -> Result<UserPreferencesRow, AppError>;
}

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfileRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserProfileRow>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfileRow, AppError> {
        Ok(sqlx::query_as::<_, UserProfileRow>(
            r#"
            INSERT INTO users
                (id, clerk_user_id, full_name, email, phone_number, location, resume_url,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            ON CONFLICT (id) DO UPDATE SET
                clerk_user_id = COALESCE(EXCLUDED.clerk_user_id, users.clerk_user_id),
                full_name     = COALESCE(EXCLUDED.full_name, users.full_name),
                email         = COALESCE(EXCLUDED.email, users.email),
                phone_number  = COALESCE(EXCLUDED.phone_number, users.phone_number),
                location      = COALESCE(EXCLUDED.location, users.location),
                resume_url    = COALESCE(EXCLUDED.resume_url, users.resume_url),
                updated_at    = now()
            RETURNING *
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.clerk_user_id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.phone_number)
        .bind(&profile.location)
        .bind(&profile.resume_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn clear_resume(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET resume_url = NULL, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferencesRow>, AppError> {
        Ok(sqlx::query_as::<_, UserPreferencesRow>(
            "SELECT * FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_preferences(
        &self,
        p: &PreferencesUpsert,
    ) -> Result<UserPreferencesRow, AppError> {
        Ok(sqlx::query_as::<_, UserPreferencesRow>(
            r#"
            INSERT INTO user_preferences
                (user_id, preferred_job_titles, target_locations, salary_min, salary_max,
                 salary_currency, employment_types, industries, key_skills,
                 work_arrangement, receive_job_alerts, alert_frequency, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now())
            ON CONFLICT (user_id) DO UPDATE SET
                preferred_job_titles = CASE WHEN 'preferred_job_titles' = ANY($13) THEN EXCLUDED.preferred_job_titles ELSE user_preferences.preferred_job_titles END,
                target_locations     = CASE WHEN 'target_locations' = ANY($13) THEN EXCLUDED.target_locations ELSE user_preferences.target_locations END,
                salary_min           = CASE WHEN 'salary_min' = ANY($13) THEN EXCLUDED.salary_min ELSE user_preferences.salary_min END,
                salary_max           = CASE WHEN 'salary_max' = ANY($13) THEN EXCLUDED.salary_max ELSE user_preferences.salary_max END,
                salary_currency      = CASE WHEN 'salary_currency' = ANY($13) THEN EXCLUDED.salary_currency ELSE user_preferences.salary_currency END,
                employment_types     = CASE WHEN 'employment_types' = ANY($13) THEN EXCLUDED.employment_types ELSE user_preferences.employment_types END,
                industries           = CASE WHEN 'industries' = ANY($13) THEN EXCLUDED.industries ELSE user_preferences.industries END,
                key_skills           = CASE WHEN 'key_skills' = ANY($13) THEN EXCLUDED.key_skills ELSE user_preferences.key_skills END,
                work_arrangement     = CASE WHEN 'work_arrangement' = ANY($13) THEN EXCLUDED.work_arrangement ELSE user_preferences.work_arrangement END,
                receive_job_alerts   = CASE WHEN 'receive_job_alerts' = ANY($13) THEN EXCLUDED.receive_job_alerts ELSE user_preferences.receive_job_alerts END,
                alert_frequency      = CASE WHEN 'alert_frequency' = ANY($13) THEN EXCLUDED.alert_frequency ELSE user_preferences.alert_frequency END,
                updated_at           = now()
            RETURNING *
            "#,
        )
        .bind(&p.user_id)
        .bind(patch_value(&p.preferred_job_titles))
        .bind(patch_value(&p.target_locations))
        .bind(patch_value(&p.salary_min))
        .bind(patch_value(&p.salary_max))
        .bind(patch_value(&p.salary_currency))
        .bind(patch_value(&p.employment_types))
        .bind(patch_value(&p.industries))
        .bind(patch_value(&p.key_skills))
        .bind(patch_value(&p.work_arrangement))
        .bind(patch_value(&p.receive_job_alerts))
        .bind(patch_value(&p.alert_frequency))
        .bind(p.present_columns())
        .fetch_one(&self.pool)
        .await?)
    }
}
