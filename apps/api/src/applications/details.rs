//! Typed view over `applications.status_details`.
//!
//! The column is free-form JSON whose shape depends on `status`. `StatusDetails`
//! picks the variant from the status and falls back to `Other` whenever the
//! payload doesn't fit, so a surprising payload never fails a read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::applications::status::ApplicationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusDetails {
    Submitted(SubmittedDetails),
    Processing(ProcessingDetails),
    AttentionRequired(AttentionDetails),
    Failed(FailureDetails),
    Other { payload: Value },
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedDetails {
    pub confirmation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingDetails {
    pub current_step: Option<String>,
    /// Fraction of the form completed, 0.0 – 1.0.
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionDetails {
    /// e.g. "CAPTCHA"
    pub reason: Option<String>,
    pub message: Option<String>,
    /// Where the user goes to unblock the automation.
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetails {
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl StatusDetails {
    pub fn from_parts(status: &ApplicationStatus, payload: Option<&Value>) -> Self {
        let payload = match payload {
            None | Some(Value::Null) => return StatusDetails::None,
            Some(p) => p,
        };

        let typed = match status {
            ApplicationStatus::SubmittedBySkyvern => decode(payload).map(StatusDetails::Submitted),
            ApplicationStatus::PendingSkyvernSubmission | ApplicationStatus::ProcessingBySkyvern => {
                decode(payload).map(StatusDetails::Processing)
            }
            ApplicationStatus::RequiresAttentionUserInput
            | ApplicationStatus::RequiresAttentionManualReview => {
                decode(payload).map(StatusDetails::AttentionRequired)
            }
            ApplicationStatus::FailedSkyvernSubmission | ApplicationStatus::FailedApplication => {
                decode(payload).map(StatusDetails::Failed)
            }
            _ => None,
        };

        typed.unwrap_or_else(|| StatusDetails::Other {
            payload: payload.clone(),
        })
    }

    /// The URL the user should open to unblock an application, if any.
    pub fn action_url(&self) -> Option<&str> {
        match self {
            StatusDetails::AttentionRequired(d) => d.action_url.as_deref(),
            _ => None,
        }
    }

    pub fn confirmation_id(&self) -> Option<&str> {
        match self {
            StatusDetails::Submitted(d) => d.confirmation_id.as_deref(),
            _ => None,
        }
    }
}

/// Decodes an object payload, rejecting non-objects so `{}`-shaped structs with
/// all-optional fields don't swallow strings or arrays.
fn decode<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    if !payload.is_object() {
        return None;
    }
    serde_json::from_value(payload.clone()).ok()
}
