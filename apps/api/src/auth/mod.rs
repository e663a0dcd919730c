pub mod jwt;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// The token is the identity provider's backend template JWT; the same token
/// the database trusts for row-level access.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub session_id: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims =
            jwt::verify(token, &state.config.jwt_secret).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }
}

/// Like `AuthUser`, but a missing or invalid token means "signed out" instead
/// of a rejection. Used where signed-out callers get an answer too.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// The automation service, authenticated by the shared `X-Automation-Key`.
/// End-user tokens are never accepted here: the automation service owns
/// record creation and pipeline status transitions.
#[derive(Debug, Clone, Copy)]
pub struct AutomationCaller;

#[async_trait]
impl FromRequestParts<AppState> for AutomationCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .automation_api_key
            .as_deref()
            .ok_or(AppError::Unauthorized)?;
        let presented = parts
            .headers
            .get(AUTOMATION_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        if keys_match(presented.as_bytes(), expected.as_bytes()) {
            Ok(AutomationCaller)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

pub const AUTOMATION_KEY_HEADER: &str = "X-Automation-Key";

/// Length-checked comparison that doesn't stop at the first differing byte.
fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
