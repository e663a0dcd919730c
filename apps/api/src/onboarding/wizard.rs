//! The four-step onboarding sequence and its per-step required-field gates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    PersonalInfo,
    JobPreferences,
    ResumeUpload,
    Complete,
}

pub const STEPS: [OnboardingStep; 4] = [
    OnboardingStep::PersonalInfo,
    OnboardingStep::JobPreferences,
    OnboardingStep::ResumeUpload,
    OnboardingStep::Complete,
];

impl OnboardingStep {
    /// Zero-based position, used for the progress dots.
    pub fn index(self) -> usize {
        match self {
            OnboardingStep::PersonalInfo => 0,
            OnboardingStep::JobPreferences => 1,
            OnboardingStep::ResumeUpload => 2,
            OnboardingStep::Complete => 3,
        }
    }

    /// Following step; `Complete` is the last and maps to itself.
    pub fn next(self) -> Self {
        STEPS[(self.index() + 1).min(STEPS.len() - 1)]
    }

    /// Preceding step; `PersonalInfo` is the first and maps to itself.
    pub fn previous(self) -> Self {
        STEPS[self.index().saturating_sub(1)]
    }

    pub fn is_final(self) -> bool {
        self == OnboardingStep::Complete
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingForm {
    pub full_name: String,
    pub phone_number: String,
    pub location: String,
    pub desired_job_title: String,
    pub target_salary: String,
    pub work_arrangement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("Please enter your full name to continue.")]
    MissingFullName,

    #[error("Please enter at least one desired job title.")]
    MissingJobTitle,
}

/// Moves forward one step if the current step's required fields are filled.
/// On failure the caller stays on `step`.
pub fn advance(step: OnboardingStep, form: &OnboardingForm) -> Result<OnboardingStep, StepError> {
    match step {
        OnboardingStep::PersonalInfo if form.full_name.trim().is_empty() => {
            Err(StepError::MissingFullName)
        }
        OnboardingStep::JobPreferences if form.desired_job_title.trim().is_empty() => {
            Err(StepError::MissingJobTitle)
        }
        _ => Ok(step.next()),
    }
}

/// Moves back one step. Going back never validates.
pub fn back(step: OnboardingStep) -> OnboardingStep {
    step.previous()
}
