pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::errors::AppError;
use crate::onboarding::handlers as onboarding;
use crate::profile::handlers as profile;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::storage::RESUME_BODY_LIMIT;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Applications API
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/statuses",
            get(applications::handle_list_statuses),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/notes",
            patch(applications::handle_update_notes),
        )
        .route(
            "/api/v1/applications/:id/withdraw",
            post(applications::handle_withdraw),
        )
        // Automation API: record creation and pipeline transitions
        .route(
            "/api/v1/automation/applications",
            post(applications::handle_create_application),
        )
        .route(
            "/api/v1/automation/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Onboarding API
        .route("/api/v1/onboarding/step", post(onboarding::handle_step))
        .route(
            "/api/v1/onboarding/complete",
            post(onboarding::handle_complete).layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        .route("/api/v1/onboarding/skip", post(onboarding::handle_skip))
        // Session API
        .route("/api/v1/session/route", get(session::handle_route))
        .route("/api/v1/session/sync", post(session::handle_sync))
        .route("/api/v1/session/sign-out", post(session::handle_sign_out))
        // Profile API
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route(
            "/api/v1/profile/personal-info",
            put(profile::handle_update_personal_info),
        )
        .route(
            "/api/v1/profile/resume",
            post(profile::handle_upload_resume)
                .delete(profile::handle_delete_resume)
                .layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        .route(
            "/api/v1/preferences",
            put(profile::handle_update_preferences),
        )
        // Account deletion has no backend yet
        .route("/api/v1/account", delete(not_implemented))
        .with_state(state)
}
