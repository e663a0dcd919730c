//! Profile-screen operations that span more than one backend call.
//!
//! Calls run sequentially and are not transactional: if a later call fails the
//! earlier ones stay applied, exactly as the client-driven flow behaved.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::identity::IdentityProvider;
use crate::models::profile::{ProfileUpsert, UserPreferencesRow, UserProfileRow};
use crate::profile::repository::ProfileRepository;
use crate::profile::validation::{validate_personal_info, PersonalInfoUpdate};
use crate::storage::{resume_file_name, ResumeStorage, ResumeUpload};

#[derive(Debug, Serialize)]
pub struct ResumeInfo {
    pub path: String,
    pub file_name: String,
    /// One-hour signed URL; `None` if signing failed.
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileOverview {
    pub profile: Option<UserProfileRow>,
    pub preferences: Option<UserPreferencesRow>,
    pub resume: Option<ResumeInfo>,
}

pub async fn load_overview(
    profiles: &dyn ProfileRepository,
    storage: &dyn ResumeStorage,
    user_id: &str,
) -> Result<ProfileOverview, AppError> {
    let profile = profiles.get_profile(user_id).await?;
    let preferences = profiles.get_preferences(user_id).await?;

    let resume = match profile.as_ref().and_then(|p| p.resume_url.clone()) {
        Some(path) => Some(resume_info(storage, path).await),
        None => None,
    };

    Ok(ProfileOverview {
        profile,
        preferences,
        resume,
    })
}

async fn resume_info(storage: &dyn ResumeStorage, path: String) -> ResumeInfo {
    let download_url = match storage.signed_url(&path).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(path = %path, "Could not sign resume URL: {e}");
            None
        }
    };
    ResumeInfo {
        file_name: resume_file_name(&path).to_string(),
        path,
        download_url,
    }
}

/// Validates, updates the identity record's name, then the profile row.
pub async fn update_personal_info(
    profiles: &dyn ProfileRepository,
    identity: &dyn IdentityProvider,
    user_id: &str,
    update: &PersonalInfoUpdate,
) -> Result<UserProfileRow, AppError> {
    let errors = validate_personal_info(update);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.messages().join("; ")));
    }

    identity
        .update_name(user_id, update.first_name.trim(), update.last_name.trim())
        .await?;

    let profile = profiles
        .upsert_profile(&ProfileUpsert {
            id: user_id.to_string(),
            clerk_user_id: Some(user_id.to_string()),
            full_name: Some(update.full_name()),
            email: Some(update.email.trim().to_string()),
            phone_number: Some(update.phone.trim().to_string()),
            location: Some(update.location.trim().to_string()),
            resume_url: None,
        })
        .await?;

    info!(user_id, "personal_info_updated");
    Ok(profile)
}

/// Uploads a new resume, points the profile at it, then removes the previous
/// object when it lived at a different path. Removal failures are only logged.
pub async fn replace_resume(
    profiles: &dyn ProfileRepository,
    storage: &dyn ResumeStorage,
    user_id: &str,
    upload: ResumeUpload,
) -> Result<ResumeInfo, AppError> {
    let previous = profiles
        .get_profile(user_id)
        .await?
        .and_then(|p| p.resume_url);

    let path = storage
        .upload(user_id, &upload.file_name, upload.bytes)
        .await?;

    let mut patch = ProfileUpsert::for_user(user_id);
    patch.resume_url = Some(path.clone());
    profiles.upsert_profile(&patch).await?;

    if let Some(old) = previous.filter(|old| *old != path) {
        if let Err(e) = storage.delete(&old).await {
            warn!(path = %old, "Failed to remove replaced resume: {e}");
        }
    }

    info!(user_id, path = %path, "profile_resume_upload_success");
    Ok(resume_info(storage, path).await)
}

/// Deletes the stored object first, then clears the profile reference, so the
/// profile never points at a missing object.
pub async fn delete_resume(
    profiles: &dyn ProfileRepository,
    storage: &dyn ResumeStorage,
    user_id: &str,
) -> Result<(), AppError> {
    let path = profiles
        .get_profile(user_id)
        .await?
        .and_then(|p| p.resume_url)
        .ok_or_else(|| AppError::NotFound("No resume uploaded".to_string()))?;

    storage.delete(&path).await?;
    profiles.clear_resume(user_id).await?;

    info!(user_id, "profile_resume_deleted");
    Ok(())
}
