//! Identity provider boundary.
//!
//! The provider owns sign-in, user records and session tokens. This service
//! reads users, flips the `onboardingCompleted` flag in their unsafe metadata,
//! issues template tokens for the backend session and revokes sessions.
//! `AppState` holds an `Arc<dyn IdentityProvider>`.

pub mod clerk;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use clerk::ClerkClient;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Identity provider returned no token")]
    EmptyToken,
}

/// The parts of the identity provider's user object this service relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityUser {
    pub id: String,
    pub full_name: Option<String>,
    pub primary_email: Option<String>,
    pub phone_numbers: Vec<String>,
    /// `unsafeMetadata.onboardingCompleted`; absent counts as not completed.
    pub onboarding_completed: bool,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError>;

    /// Sets `onboardingCompleted` in the user's unsafe metadata, keeping other keys.
    async fn set_onboarding_completed(
        &self,
        user_id: &str,
        completed: bool,
    ) -> Result<(), IdentityError>;

    async fn update_name(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError>;

    /// Issues a JWT for the given session from a named template.
    async fn issue_token(&self, session_id: &str, template: &str)
        -> Result<String, IdentityError>;

    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError>;
}

impl From<IdentityError> for crate::errors::AppError {
    fn from(e: IdentityError) -> Self {
        crate::errors::AppError::Identity(e.to_string())
    }
}
