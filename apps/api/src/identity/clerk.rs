use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::identity::{IdentityError, IdentityProvider, IdentityUser};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend API client for the identity provider.
/// No retries: a failed call surfaces to the caller as-is.
#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    unsafe_metadata: Value,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct PhoneNumber {
    phone_number: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    jwt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl From<UserResponse> for IdentityUser {
    fn from(user: UserResponse) -> Self {
        let full_name = [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let primary_email = user
            .primary_email_address_id
            .as_deref()
            .and_then(|pid| user.email_addresses.iter().find(|e| e.id == pid))
            .map(|e| e.email_address.clone());

        IdentityUser {
            id: user.id,
            full_name: (!full_name.is_empty()).then_some(full_name),
            primary_email,
            phone_numbers: user
                .phone_numbers
                .into_iter()
                .map(|p| p.phone_number)
                .collect(),
            onboarding_completed: user
                .unsafe_metadata
                .get("onboardingCompleted")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

impl ClerkClient {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a non-2xx reply to `IdentityError::Api`, preferring the provider's message.
    async fn check(response: Response) -> Result<Response, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .map(|e| e.message)
            .unwrap_or(body);
        Err(IdentityError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError> {
        let response = self
            .client
            .get(self.url(&format!("/users/{user_id}")))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        let user: UserResponse = Self::check(response).await?.json().await?;
        debug!(user_id, "Fetched identity user");
        Ok(user.into())
    }

    async fn set_onboarding_completed(
        &self,
        user_id: &str,
        completed: bool,
    ) -> Result<(), IdentityError> {
        let response = self
            .client
            .patch(self.url(&format!("/users/{user_id}/metadata")))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "unsafe_metadata": { "onboardingCompleted": completed } }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_name(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        let response = self
            .client
            .patch(self.url(&format!("/users/{user_id}")))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "first_name": first_name, "last_name": last_name }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn issue_token(
        &self,
        session_id: &str,
        template: &str,
    ) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{session_id}/tokens/{template}")))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        let token: TokenResponse = Self::check(response).await?.json().await?;
        token
            .jwt
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::EmptyToken)
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.url(&format!("/sessions/{session_id}/revoke")))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
