//! Axum route handlers for the Profile API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::{PreferencesUpsert, UserPreferencesRow, UserProfileRow};
use crate::profile::service::{
    delete_resume, load_overview, replace_resume, update_personal_info, ProfileOverview,
    ResumeInfo,
};
use crate::profile::validation::PersonalInfoUpdate;
use crate::state::AppState;
use crate::storage::{multipart_error, ResumeUpload};

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileOverview>, AppError> {
    let overview = load_overview(
        state.profiles.as_ref(),
        state.storage.as_ref(),
        &user.user_id,
    )
    .await?;
    Ok(Json(overview))
}

/// PUT /api/v1/profile/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<PersonalInfoUpdate>,
) -> Result<Json<UserProfileRow>, AppError> {
    let profile = update_personal_info(
        state.profiles.as_ref(),
        state.identity.as_ref(),
        &user.user_id,
        &update,
    )
    .await?;
    Ok(Json(profile))
}

/// PUT /api/v1/preferences
///
/// Partial upsert; the row is always keyed by the caller, whatever `user_id`
/// the body carries.
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut preferences): Json<PreferencesUpsert>,
) -> Result<Json<UserPreferencesRow>, AppError> {
    preferences.user_id = user.user_id.clone();
    let row = state.profiles.upsert_preferences(&preferences).await?;
    info!(user_id = %user.user_id, "preferences_updated");
    Ok(Json(row))
}

/// POST /api/v1/profile/resume
///
/// Multipart body with a single `resume` file part.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeInfo>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() == Some("resume") {
            upload = Some(ResumeUpload::from_field(field).await?);
        }
    }
    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing resume file part".to_string()))?;

    let info = replace_resume(
        state.profiles.as_ref(),
        state.storage.as_ref(),
        &user.user_id,
        upload,
    )
    .await
    .map_err(|e| {
        error!(user_id = %user.user_id, "profile_resume_upload_failed: {e}");
        e
    })?;

    Ok((StatusCode::CREATED, Json(info)))
}

/// DELETE /api/v1/profile/resume
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    delete_resume(
        state.profiles.as_ref(),
        state.storage.as_ref(),
        &user.user_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
