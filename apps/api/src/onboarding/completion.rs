//! Onboarding completion and skip.
//!
//! Completion is a fixed sequence of independent backend writes. It stops at
//! the first failure and leaves the earlier writes in place; there is no
//! rollback. `CompletionFailure::completed` records how far it got.

use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::errors::AppError;
use crate::identity::IdentityProvider;
use crate::models::profile::{PreferencesUpsert, ProfileUpsert};
use crate::onboarding::salary::{parse_salary, SalaryRange};
use crate::onboarding::wizard::{advance, OnboardingForm, OnboardingStep};
use crate::profile::repository::ProfileRepository;
use crate::storage::{ResumeStorage, ResumeUpload};

pub const COMPLETE_FAILED_MESSAGE: &str = "Failed to complete onboarding. Please try again.";
pub const SKIP_FAILED_MESSAGE: &str = "Failed to skip onboarding. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStep {
    ProfileSaved,
    PreferencesSaved,
    ResumeUploaded,
    ResumeLinked,
    OnboardingMarked,
}

#[derive(Debug, Serialize)]
pub struct CompletionReport {
    pub completed: Vec<CompletionStep>,
    pub salary: SalaryRange,
    pub resume_path: Option<String>,
}

#[derive(Debug)]
pub struct CompletionFailure {
    pub completed: Vec<CompletionStep>,
    pub source: AppError,
}

/// The backends onboarding writes to.
pub struct OnboardingDeps<'a> {
    pub profiles: &'a dyn ProfileRepository,
    pub storage: &'a dyn ResumeStorage,
    pub identity: &'a dyn IdentityProvider,
}

struct Progress {
    completed: Vec<CompletionStep>,
}

impl Progress {
    fn record<T>(
        &mut self,
        step: CompletionStep,
        result: Result<T, AppError>,
    ) -> Result<T, CompletionFailure> {
        match result {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(source) => Err(CompletionFailure {
                completed: std::mem::take(&mut self.completed),
                source,
            }),
        }
    }

    /// Checks and reads that precede any write; a failure here has nothing to report.
    fn record_lookup<T>(&self, result: Result<T, AppError>) -> Result<T, CompletionFailure> {
        result.map_err(|source| CompletionFailure {
            completed: self.completed.clone(),
            source,
        })
    }
}

/// Unparsed salary parts and a blank arrangement are left out, so stored
/// values survive.
pub fn preferences_from_form(
    user_id: &str,
    form: &OnboardingForm,
    salary: SalaryRange,
) -> PreferencesUpsert {
    let work_arrangement = form.work_arrangement.trim();
    PreferencesUpsert {
        user_id: user_id.to_string(),
        preferred_job_titles: Some(Some(vec![form.desired_job_title.trim().to_string()])),
        work_arrangement: (!work_arrangement.is_empty())
            .then(|| Some(vec![work_arrangement.to_string()])),
        target_locations: Some(Some(json!([
            { "city": form.location.trim(), "state": null, "country": null }
        ]))),
        salary_min: salary.min.map(Some),
        salary_max: salary.max.map(Some),
        ..Default::default()
    }
}

/// Re-checks the wizard's required-field gates; the form may not have gone
/// through `/onboarding/step`.
fn ensure_required_fields(form: &OnboardingForm) -> Result<(), AppError> {
    for step in [OnboardingStep::PersonalInfo, OnboardingStep::JobPreferences] {
        advance(step, form).map_err(|e| AppError::Validation(e.to_string()))?;
    }
    Ok(())
}

/// Saves the profile, preferences and optional resume, then marks onboarding
/// complete on the identity record.
pub async fn complete_onboarding(
    deps: &OnboardingDeps<'_>,
    user_id: &str,
    form: &OnboardingForm,
    resume: Option<ResumeUpload>,
) -> Result<CompletionReport, CompletionFailure> {
    let mut progress = Progress {
        completed: Vec::new(),
    };

    progress.record_lookup(ensure_required_fields(form))?;

    let identity_user =
        progress.record_lookup(deps.identity.get_user(user_id).await.map_err(AppError::from))?;

    // A blank phone falls back to the identity record's first number.
    let phone_number = match form.phone_number.trim() {
        "" => identity_user.phone_numbers.first().cloned().unwrap_or_default(),
        phone => phone.to_string(),
    };

    // 1. Profile
    let profile = ProfileUpsert {
        id: user_id.to_string(),
        clerk_user_id: Some(user_id.to_string()),
        full_name: Some(form.full_name.trim().to_string()),
        email: identity_user.primary_email.clone(),
        phone_number: Some(phone_number),
        location: Some(form.location.trim().to_string()),
        resume_url: None,
    };
    progress.record(
        CompletionStep::ProfileSaved,
        deps.profiles.upsert_profile(&profile).await,
    )?;

    // 2. Salary
    let salary = parse_salary(&form.target_salary);

    // 3. Preferences
    let preferences = preferences_from_form(user_id, form, salary);
    progress.record(
        CompletionStep::PreferencesSaved,
        deps.profiles.upsert_preferences(&preferences).await,
    )?;

    // 4. Resume
    let mut resume_path = None;
    if let Some(upload) = resume {
        let path = progress.record(
            CompletionStep::ResumeUploaded,
            deps.storage
                .upload(user_id, &upload.file_name, upload.bytes)
                .await,
        )?;

        let mut patch = ProfileUpsert::for_user(user_id);
        patch.resume_url = Some(path.clone());
        progress.record(
            CompletionStep::ResumeLinked,
            deps.profiles.upsert_profile(&patch).await,
        )?;
        resume_path = Some(path);
    }

    // 5. Identity flag
    progress.record(
        CompletionStep::OnboardingMarked,
        deps.identity
            .set_onboarding_completed(user_id, true)
            .await
            .map_err(AppError::from),
    )?;

    info!(user_id, steps = ?progress.completed, "new_user_onboarding_completed");

    Ok(CompletionReport {
        completed: progress.completed,
        salary,
        resume_path,
    })
}

/// Saves a minimal profile from the identity record and marks onboarding complete.
pub async fn skip_onboarding(deps: &OnboardingDeps<'_>, user_id: &str) -> Result<(), AppError> {
    let user = deps.identity.get_user(user_id).await?;

    deps.profiles
        .upsert_profile(&ProfileUpsert {
            id: user_id.to_string(),
            clerk_user_id: Some(user_id.to_string()),
            full_name: Some(user.full_name.unwrap_or_default()),
            email: Some(user.primary_email.unwrap_or_default()),
            ..Default::default()
        })
        .await?;

    deps.identity.set_onboarding_completed(user_id, true).await?;

    info!(user_id, "new_user_onboarding_skipped");
    Ok(())
}

/// Logs the failure with its partial progress and returns the user-facing error.
pub fn report_failure(user_id: &str, failure: CompletionFailure) -> AppError {
    match failure.source {
        e @ AppError::Validation(_) => e,
        source => {
            error!(
                user_id,
                completed = ?failure.completed,
                "Error completing onboarding: {source}"
            );
            AppError::ActionFailed(COMPLETE_FAILED_MESSAGE.to_string())
        }
    }
}
