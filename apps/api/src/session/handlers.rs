//! Axum route handlers for the Session API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::errors::AppError;
use crate::session::context::SessionContext;
use crate::session::gate::{redirect_for, RouteGroup, SessionEvent, SessionState};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub group: RouteGroup,
}

#[derive(Debug, Serialize)]
pub struct RouteDecision {
    pub signed_in: bool,
    pub onboarding_completed: bool,
    pub redirect: Option<RouteGroup>,
}

impl RouteDecision {
    fn new(state: SessionState, redirect: Option<RouteGroup>) -> Self {
        Self {
            signed_in: state.signed_in,
            onboarding_completed: state.onboarding_completed,
            redirect,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    pub session_id: Option<String>,
    pub group: Option<RouteGroup>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub backend_token: Option<String>,
    #[serde(flatten)]
    pub decision: RouteDecision,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignOutRequest {
    pub session_id: Option<String>,
}

/// GET /api/v1/session/route?group=
///
/// Evaluates the route gate for the caller's current group. Signed-out callers
/// (no or invalid token) get an answer as well.
pub async fn handle_route(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteDecision>, AppError> {
    let session = match user {
        Some(user) => {
            let identity_user = state.identity.get_user(&user.user_id).await?;
            SessionState::default().apply(SessionEvent::SignedIn {
                onboarding_completed: identity_user.onboarding_completed,
            })
        }
        None => SessionState::default(),
    };

    Ok(Json(RouteDecision::new(
        session,
        redirect_for(&session, query.group),
    )))
}

/// POST /api/v1/session/sync
///
/// Runs the sign-in transition: reads the onboarding flag, mirrors a backend
/// token from the configured template, and reports where the client belongs.
pub async fn handle_sync(
    State(state): State<AppState>,
    user: AuthUser,
    request: Option<Json<SyncRequest>>,
) -> Result<Json<SyncResponse>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let identity_user = state.identity.get_user(&user.user_id).await?;
    let session_id = request.session_id.or(user.session_id);

    let mut ctx = SessionContext::default();
    ctx.dispatch(
        SessionEvent::SignedIn {
            onboarding_completed: identity_user.onboarding_completed,
        },
        state.identity.as_ref(),
        session_id.as_deref(),
        &state.config.jwt_template,
    )
    .await;

    let redirect = request
        .group
        .map_or(Some(ctx.state().home()), |group| ctx.redirect_for(group));

    Ok(Json(SyncResponse {
        backend_token: ctx.backend_token().map(str::to_string),
        decision: RouteDecision::new(ctx.state(), redirect),
    }))
}

/// POST /api/v1/session/sign-out
///
/// The body is optional; without one the token's session is revoked.
pub async fn handle_sign_out(
    State(state): State<AppState>,
    user: AuthUser,
    request: Option<Json<SignOutRequest>>,
) -> Result<StatusCode, AppError> {
    let session_id = request
        .and_then(|Json(r)| r.session_id)
        .or(user.session_id)
        .ok_or_else(|| AppError::Validation("session_id is required".to_string()))?;

    if let Err(e) = state.identity.revoke_session(&session_id).await {
        warn!(user_id = %user.user_id, "Error signing out: {e}");
        return Err(e.into());
    }

    info!(user_id = %user.user_id, "user_signed_out");
    Ok(StatusCode::NO_CONTENT)
}
