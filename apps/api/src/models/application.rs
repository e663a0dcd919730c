use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;

/// Row of the `applications` table. Records are created and transitioned by the
/// automation service; this API reads them and writes back notes and withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: String,
    pub job_title: String,
    pub company_name: String,
    pub job_url: String,
    pub adzuna_job_id: Option<String>,
    pub skyvern_task_id: Option<String>,
    pub status: String,
    pub status_details: Option<Value>,
    pub applied_at: Option<DateTime<Utc>>,
    pub last_status_update_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub resume_url_used: Option<String>,
    pub cover_letter_url_used: Option<String>,
    pub application_source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    pub fn parsed_status(&self) -> ApplicationStatus {
        ApplicationStatus::parse(&self.status)
    }
}

/// Insert payload for a new application record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub job_title: String,
    pub company_name: String,
    pub job_url: String,
    pub adzuna_job_id: Option<String>,
    pub skyvern_task_id: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    pub status_details: Option<Value>,
    pub applied_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub resume_url_used: Option<String>,
    pub cover_letter_url_used: Option<String>,
    pub application_source: Option<String>,
}
