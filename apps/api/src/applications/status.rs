//! Application status taxonomy: labels and display tones for the statuses the
//! automation service writes into `applications.status`.
//!
//! The set is flat: there is no transition graph. Unknown values read from the
//! database are carried as `Unknown` and degrade to a humanized label and a
//! neutral tone instead of failing the request.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Draft,
    PendingSkyvernSubmission,
    ProcessingBySkyvern,
    SubmittedBySkyvern,
    RequiresAttentionUserInput,
    RequiresAttentionManualReview,
    FailedSkyvernSubmission,
    FailedApplication,
    AppliedManually,
    InterviewScheduled,
    OfferReceived,
    RejectedByCompany,
    WithdrawnByUser,
    Unknown(String),
}

/// Display severity class. `Neutral` is the default text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Warning,
    Error,
    Neutral,
}

/// Every status the automation service is known to write, in pipeline order.
pub const KNOWN_STATUSES: [ApplicationStatus; 13] = [
    ApplicationStatus::Draft,
    ApplicationStatus::PendingSkyvernSubmission,
    ApplicationStatus::ProcessingBySkyvern,
    ApplicationStatus::SubmittedBySkyvern,
    ApplicationStatus::RequiresAttentionUserInput,
    ApplicationStatus::RequiresAttentionManualReview,
    ApplicationStatus::FailedSkyvernSubmission,
    ApplicationStatus::FailedApplication,
    ApplicationStatus::AppliedManually,
    ApplicationStatus::InterviewScheduled,
    ApplicationStatus::OfferReceived,
    ApplicationStatus::RejectedByCompany,
    ApplicationStatus::WithdrawnByUser,
];

impl ApplicationStatus {
    /// Parses a raw status value. Never fails: unrecognised text becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "DRAFT" => Self::Draft,
            "PENDING_SKYVERN_SUBMISSION" => Self::PendingSkyvernSubmission,
            "PROCESSING_BY_SKYVERN" => Self::ProcessingBySkyvern,
            "SUBMITTED_BY_SKYVERN" => Self::SubmittedBySkyvern,
            "REQUIRES_ATTENTION_USER_INPUT" => Self::RequiresAttentionUserInput,
            "REQUIRES_ATTENTION_MANUAL_REVIEW" => Self::RequiresAttentionManualReview,
            "FAILED_SKYVERN_SUBMISSION" => Self::FailedSkyvernSubmission,
            "FAILED_APPLICATION" => Self::FailedApplication,
            "APPLIED_MANUALLY" => Self::AppliedManually,
            "INTERVIEW_SCHEDULED" => Self::InterviewScheduled,
            "OFFER_RECEIVED" => Self::OfferReceived,
            "REJECTED_BY_COMPANY" => Self::RejectedByCompany,
            "WITHDRAWN_BY_USER" => Self::WithdrawnByUser,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingSkyvernSubmission => "PENDING_SKYVERN_SUBMISSION",
            Self::ProcessingBySkyvern => "PROCESSING_BY_SKYVERN",
            Self::SubmittedBySkyvern => "SUBMITTED_BY_SKYVERN",
            Self::RequiresAttentionUserInput => "REQUIRES_ATTENTION_USER_INPUT",
            Self::RequiresAttentionManualReview => "REQUIRES_ATTENTION_MANUAL_REVIEW",
            Self::FailedSkyvernSubmission => "FAILED_SKYVERN_SUBMISSION",
            Self::FailedApplication => "FAILED_APPLICATION",
            Self::AppliedManually => "APPLIED_MANUALLY",
            Self::InterviewScheduled => "INTERVIEW_SCHEDULED",
            Self::OfferReceived => "OFFER_RECEIVED",
            Self::RejectedByCompany => "REJECTED_BY_COMPANY",
            Self::WithdrawnByUser => "WITHDRAWN_BY_USER",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Human-readable label shown in the applications list and detail view.
    /// Only the four statuses the automation surfaces to the user get a
    /// dedicated label; every other value is shown humanized.
    pub fn label(&self) -> String {
        match self {
            Self::ProcessingBySkyvern => "Processing".to_string(),
            Self::SubmittedBySkyvern => "Submitted".to_string(),
            Self::RequiresAttentionUserInput => "Action Required".to_string(),
            Self::FailedSkyvernSubmission => "Failed".to_string(),
            other => humanize(other.as_str()),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::SubmittedBySkyvern => StatusTone::Success,
            Self::ProcessingBySkyvern | Self::RequiresAttentionUserInput => StatusTone::Warning,
            Self::FailedSkyvernSubmission => StatusTone::Error,
            _ => StatusTone::Neutral,
        }
    }

    /// Statuses after which the automation pipeline does not move the record again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::FailedApplication
                | Self::OfferReceived
                | Self::RejectedByCompany
                | Self::WithdrawnByUser
        )
    }

    /// Whether the user has to act (solve a CAPTCHA, answer a question) before
    /// the automation can continue.
    pub fn requires_attention(&self) -> bool {
        matches!(
            self,
            Self::RequiresAttentionUserInput | Self::RequiresAttentionManualReview
        )
    }
}

/// Label for a raw status value.
pub fn status_label(raw: &str) -> String {
    ApplicationStatus::parse(raw).label()
}

/// Display tone for a raw status value.
pub fn status_tone(raw: &str) -> StatusTone {
    ApplicationStatus::parse(raw).tone()
}

fn humanize(raw: &str) -> String {
    raw.replace('_', " ").to_lowercase()
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_for_every_known_status() {
        let expected = [
            ("DRAFT", "draft"),
            ("PENDING_SKYVERN_SUBMISSION", "pending skyvern submission"),
            ("PROCESSING_BY_SKYVERN", "Processing"),
            ("SUBMITTED_BY_SKYVERN", "Submitted"),
            ("REQUIRES_ATTENTION_USER_INPUT", "Action Required"),
            ("REQUIRES_ATTENTION_MANUAL_REVIEW", "requires attention manual review"),
            ("FAILED_SKYVERN_SUBMISSION", "Failed"),
            ("FAILED_APPLICATION", "failed application"),
            ("APPLIED_MANUALLY", "applied manually"),
            ("INTERVIEW_SCHEDULED", "interview scheduled"),
            ("OFFER_RECEIVED", "offer received"),
            ("REJECTED_BY_COMPANY", "rejected by company"),
            ("WITHDRAWN_BY_USER", "withdrawn by user"),
        ];
        for (raw, label) in expected {
            assert_eq!(status_label(raw), label, "label for {raw}");
        }
    }

    #[test]
    fn test_unknown_label_is_humanized() {
        assert_eq!(status_label("WAITING_ON_RECRUITER"), "waiting on recruiter");
        assert_eq!(status_label("Some_Mixed_Case"), "some mixed case");
        assert_eq!(status_label(""), "");
    }

    #[test]
    fn test_known_tones() {
        assert_eq!(status_tone("SUBMITTED_BY_SKYVERN"), StatusTone::Success);
        assert_eq!(status_tone("PROCESSING_BY_SKYVERN"), StatusTone::Warning);
        assert_eq!(status_tone("REQUIRES_ATTENTION_USER_INPUT"), StatusTone::Warning);
        assert_eq!(status_tone("FAILED_SKYVERN_SUBMISSION"), StatusTone::Error);
        assert_eq!(status_tone("WITHDRAWN_BY_USER"), StatusTone::Neutral);
    }

    #[test]
    fn test_unlabelled_known_statuses_use_default_tone() {
        for raw in [
            "DRAFT",
            "PENDING_SKYVERN_SUBMISSION",
            "REQUIRES_ATTENTION_MANUAL_REVIEW",
            "FAILED_APPLICATION",
            "APPLIED_MANUALLY",
            "INTERVIEW_SCHEDULED",
            "OFFER_RECEIVED",
            "REJECTED_BY_COMPANY",
            "WITHDRAWN_BY_USER",
        ] {
            assert_eq!(status_tone(raw), StatusTone::Neutral, "tone for {raw}");
        }
    }

    #[test]
    fn test_unknown_tone_is_neutral() {
        assert_eq!(status_tone("SOMETHING_NEW"), StatusTone::Neutral);
        assert_eq!(status_tone("submitted_by_skyvern"), StatusTone::Neutral);
    }

    #[test]
    fn test_parse_round_trips_all_known_values() {
        for status in KNOWN_STATUSES.iter() {
            let parsed = ApplicationStatus::parse(status.as_str());
            assert_eq!(&parsed, status);
            assert!(parsed.is_known());
        }
        assert!(!ApplicationStatus::parse("NOPE").is_known());
    }

    #[test]
    fn test_serde_uses_raw_values() {
        let json = serde_json::to_string(&ApplicationStatus::WithdrawnByUser).unwrap();
        assert_eq!(json, "\"WITHDRAWN_BY_USER\"");

        let unknown: ApplicationStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(unknown, ApplicationStatus::Unknown("ON_HOLD".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"ON_HOLD\"");

        assert_eq!(
            serde_json::to_string(&StatusTone::Neutral).unwrap(),
            "\"neutral\""
        );
    }

    #[test]
    fn test_terminal_and_attention_flags() {
        assert!(ApplicationStatus::RejectedByCompany.is_terminal());
        assert!(ApplicationStatus::OfferReceived.is_terminal());
        assert!(!ApplicationStatus::ProcessingBySkyvern.is_terminal());
        assert!(ApplicationStatus::RequiresAttentionManualReview.requires_attention());
        assert!(!ApplicationStatus::SubmittedBySkyvern.requires_attention());
    }
}
