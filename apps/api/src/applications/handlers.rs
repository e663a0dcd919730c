//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::applications::details::StatusDetails;
use crate::applications::repository::StatusUpdate;
use crate::applications::status::{ApplicationStatus, StatusTone, KNOWN_STATUSES};
use crate::auth::{AuthUser, AutomationCaller};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// An application row plus everything the list/detail screens render from it.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub status_label: String,
    pub status_tone: StatusTone,
    pub details: StatusDetails,
    pub action_url: Option<String>,
    pub confirmation_id: Option<String>,
    pub requires_attention: bool,
    pub is_terminal: bool,
    pub can_withdraw: bool,
}

impl From<ApplicationRow> for ApplicationView {
    fn from(application: ApplicationRow) -> Self {
        let status = application.parsed_status();
        let details = StatusDetails::from_parts(&status, application.status_details.as_ref());
        Self {
            status_label: status.label(),
            status_tone: status.tone(),
            action_url: details.action_url().map(str::to_string),
            confirmation_id: details.confirmation_id().map(str::to_string),
            details,
            requires_attention: status.requires_attention(),
            is_terminal: status.is_terminal(),
            can_withdraw: status != ApplicationStatus::WithdrawnByUser,
            application,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationView>,
    pub total: usize,
}

/// One entry of the status filter.
#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub status: ApplicationStatus,
    pub label: String,
    pub tone: StatusTone,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

/// Status transition posted by the automation service on behalf of `user_id`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub user_id: String,
    pub status: ApplicationStatus,
    pub status_details: Option<Value>,
}

/// New record posted by the automation service on behalf of `user_id`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub application: NewApplication,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let filter = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "all")
        .map(ApplicationStatus::parse);

    let rows = state
        .applications
        .list_for_user(&user.user_id, filter.as_ref())
        .await?;
    let applications: Vec<ApplicationView> = rows.into_iter().map(Into::into).collect();

    Ok(Json(ApplicationListResponse {
        total: applications.len(),
        applications,
    }))
}

/// GET /api/v1/applications/statuses
pub async fn handle_list_statuses(_user: AuthUser) -> Json<Vec<StatusOption>> {
    Json(
        KNOWN_STATUSES
            .iter()
            .map(|status| StatusOption {
                status: status.clone(),
                label: status.label(),
                tone: status.tone(),
            })
            .collect(),
    )
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationView>, AppError> {
    let row = state
        .applications
        .get(&user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row.into()))
}

/// POST /api/v1/automation/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    _caller: AutomationCaller,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<ApplicationView>), AppError> {
    let CreateRequest {
        user_id,
        application,
    } = request;
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }
    if application.job_title.trim().is_empty() || application.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "job_title and company_name are required".to_string(),
        ));
    }
    if let Some(status) = &application.status {
        ensure_known(status)?;
    }

    let row = state.applications.create(&user_id, &application).await?;
    info!(application_id = %row.id, status = %row.status, "application_created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// PATCH /api/v1/automation/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    _caller: AutomationCaller,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<ApplicationView>, AppError> {
    ensure_known(&request.status)?;

    let update = StatusUpdate::new(request.status, request.status_details, Utc::now());
    let row = state
        .applications
        .update_status(&request.user_id, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(application_id = %id, status = %update.status, "application_status_updated");
    Ok(Json(row.into()))
}

/// PATCH /api/v1/applications/:id/notes
pub async fn handle_update_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<NotesRequest>,
) -> Result<Json<ApplicationView>, AppError> {
    let row = state
        .applications
        .update_notes(&user.user_id, id, &request.notes)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(application_id = %id, "application_notes_updated");
    Ok(Json(row.into()))
}

/// POST /api/v1/applications/:id/withdraw
///
/// Overwrites the status unconditionally, terminal statuses included.
pub async fn handle_withdraw(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationView>, AppError> {
    let update = StatusUpdate::withdrawal(Utc::now());
    let row = state
        .applications
        .update_status(&user.user_id, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(application_id = %id, "application_withdrawn");
    Ok(Json(row.into()))
}

/// Writes only ever store one of the known statuses; `Unknown` exists for reads.
fn ensure_known(status: &ApplicationStatus) -> Result<(), AppError> {
    if status.is_known() {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Unknown application status: {status}")))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}
