//! Axum route handlers for the Onboarding API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::onboarding::completion::{
    complete_onboarding, report_failure, skip_onboarding, CompletionReport, OnboardingDeps,
    SKIP_FAILED_MESSAGE,
};
use crate::onboarding::wizard::{advance, back, OnboardingForm, OnboardingStep};
use crate::state::AppState;
use crate::storage::{multipart_error, ResumeUpload};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Back,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub step: OnboardingStep,
    pub direction: Direction,
    #[serde(default)]
    pub form: OnboardingForm,
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step: OnboardingStep,
    pub step_index: usize,
    pub is_final: bool,
}

impl From<OnboardingStep> for StepResponse {
    fn from(step: OnboardingStep) -> Self {
        Self {
            step,
            step_index: step.index(),
            is_final: step.is_final(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatusResponse {
    pub onboarding_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub onboarding_completed: bool,
    pub report: CompletionReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/onboarding/step
///
/// Applies one wizard transition. A failed required-field gate is a 400 with
/// the message the wizard shows; the caller stays on its current step.
pub async fn handle_step(
    _user: AuthUser,
    Json(request): Json<StepRequest>,
) -> Result<Json<StepResponse>, AppError> {
    let step = match request.direction {
        Direction::Next => advance(request.step, &request.form)
            .map_err(|e| AppError::Validation(e.to_string()))?,
        Direction::Back => back(request.step),
    };
    Ok(Json(step.into()))
}

/// POST /api/v1/onboarding/complete
///
/// Multipart body: a `form` part holding the wizard's JSON form and an
/// optional `resume` file part.
pub async fn handle_complete(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<CompleteResponse>, AppError> {
    let mut form: Option<OnboardingForm> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "form" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read form: {e}")))?;
                form = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| AppError::Validation(format!("Invalid form: {e}")))?,
                );
            }
            "resume" => resume = Some(ResumeUpload::from_field(field).await?),
            _ => {}
        }
    }

    let form = form.ok_or_else(|| AppError::Validation("Missing form part".to_string()))?;

    let deps = OnboardingDeps {
        profiles: state.profiles.as_ref(),
        storage: state.storage.as_ref(),
        identity: state.identity.as_ref(),
    };
    let report = complete_onboarding(&deps, &user.user_id, &form, resume)
        .await
        .map_err(|failure| report_failure(&user.user_id, failure))?;

    Ok(Json(CompleteResponse {
        onboarding_completed: true,
        report,
    }))
}

/// POST /api/v1/onboarding/skip
pub async fn handle_skip(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<OnboardingStatusResponse>, AppError> {
    let deps = OnboardingDeps {
        profiles: state.profiles.as_ref(),
        storage: state.storage.as_ref(),
        identity: state.identity.as_ref(),
    };
    skip_onboarding(&deps, &user.user_id).await.map_err(|e| {
        error!(user_id = %user.user_id, "Error skipping onboarding: {e}");
        AppError::ActionFailed(SKIP_FAILED_MESSAGE.to_string())
    })?;

    Ok(Json(OnboardingStatusResponse {
        onboarding_completed: true,
    }))
}
