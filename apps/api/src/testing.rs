//! In-memory implementations of the repository, storage and identity seams.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::applications::repository::{ApplicationRepository, StatusUpdate};
use crate::applications::status::ApplicationStatus;
use crate::auth::jwt::test_support::TEST_SECRET;
use crate::config::Config;
use crate::errors::AppError;
use crate::identity::{IdentityError, IdentityProvider, IdentityUser};
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::profile::{
    Patch, PreferencesUpsert, ProfileUpsert, UserPreferencesRow, UserProfileRow,
};
use crate::profile::repository::ProfileRepository;
use crate::state::AppState;
use crate::storage::{resume_path, ResumeStorage};

pub const AUTOMATION_TEST_KEY: &str = "automation-test-key";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/jobraker_test".to_string(),
        s3_bucket: "resumes".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        identity_api_url: "http://localhost:0".to_string(),
        identity_secret_key: "sk_test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_template: "supabase".to_string(),
        automation_api_key: Some(AUTOMATION_TEST_KEY.to_string()),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// Fakes behind an `AppState`, kept reachable for assertions.
pub struct TestApp {
    pub applications: Arc<FakeApplications>,
    pub profiles: Arc<FakeProfiles>,
    pub storage: Arc<FakeStorage>,
    pub identity: Arc<FakeIdentity>,
}

impl TestApp {
    pub fn new(identity: FakeIdentity) -> Self {
        Self {
            applications: Arc::new(FakeApplications::default()),
            profiles: Arc::new(FakeProfiles::default()),
            storage: Arc::new(FakeStorage::default()),
            identity: Arc::new(identity),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            config: test_config(),
            applications: self.applications.clone(),
            profiles: self.profiles.clone(),
            storage: self.storage.clone(),
            identity: self.identity.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProfiles {
    profiles: Mutex<HashMap<String, UserProfileRow>>,
    preferences: Mutex<HashMap<String, UserPreferencesRow>>,
}

impl FakeProfiles {
    pub fn profile(&self, user_id: &str) -> Option<UserProfileRow> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }

    pub fn preferences(&self, user_id: &str) -> Option<UserPreferencesRow> {
        self.preferences.lock().unwrap().get(user_id).cloned()
    }
}

fn keep<T>(incoming: &Option<T>, stored: Option<T>) -> Option<T>
where
    T: Clone,
{
    incoming.clone().or(stored)
}

fn merge<T>(incoming: &Patch<T>, stored: Option<T>) -> Option<T>
where
    T: Clone,
{
    match incoming {
        Some(value) => value.clone(),
        None => stored,
    }
}

#[async_trait]
impl ProfileRepository for FakeProfiles {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfileRow>, AppError> {
        Ok(self.profile(user_id))
    }

    async fn upsert_profile(&self, p: &ProfileUpsert) -> Result<UserProfileRow, AppError> {
        let now = Utc::now();
        let mut rows = self.profiles.lock().unwrap();
        let existing = rows.remove(&p.id);
        let created_at = existing.as_ref().map_or(now, |r| r.created_at);
        let existing = existing.unwrap_or_else(|| UserProfileRow {
            id: p.id.clone(),
            clerk_user_id: None,
            full_name: None,
            email: None,
            phone_number: None,
            location: None,
            resume_url: None,
            created_at: now,
            updated_at: now,
        });

        let row = UserProfileRow {
            id: p.id.clone(),
            clerk_user_id: keep(&p.clerk_user_id, existing.clerk_user_id),
            full_name: keep(&p.full_name, existing.full_name),
            email: keep(&p.email, existing.email),
            phone_number: keep(&p.phone_number, existing.phone_number),
            location: keep(&p.location, existing.location),
            resume_url: keep(&p.resume_url, existing.resume_url),
            created_at,
            updated_at: now,
        };
        rows.insert(p.id.clone(), row.clone());
        Ok(row)
    }

    async fn clear_resume(&self, user_id: &str) -> Result<(), AppError> {
        if let Some(row) = self.profiles.lock().unwrap().get_mut(user_id) {
            row.resume_url = None;
        }
        Ok(())
    }

    async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferencesRow>, AppError> {
        Ok(self.preferences(user_id))
    }

    async fn upsert_preferences(
        &self,
        p: &PreferencesUpsert,
    ) -> Result<UserPreferencesRow, AppError> {
        let mut rows = self.preferences.lock().unwrap();
        let old = rows.remove(&p.user_id);
        let old = old.as_ref();

        let row = UserPreferencesRow {
            user_id: p.user_id.clone(),
            preferred_job_titles: merge(
                &p.preferred_job_titles,
                old.and_then(|o| o.preferred_job_titles.clone()),
            ),
            target_locations: merge(
                &p.target_locations,
                old.and_then(|o| o.target_locations.clone()),
            ),
            salary_min: merge(&p.salary_min, old.and_then(|o| o.salary_min)),
            salary_max: merge(&p.salary_max, old.and_then(|o| o.salary_max)),
            salary_currency: merge(
                &p.salary_currency,
                old.and_then(|o| o.salary_currency.clone()),
            ),
            employment_types: merge(
                &p.employment_types,
                old.and_then(|o| o.employment_types.clone()),
            ),
            industries: merge(&p.industries, old.and_then(|o| o.industries.clone())),
            key_skills: merge(&p.key_skills, old.and_then(|o| o.key_skills.clone())),
            work_arrangement: merge(
                &p.work_arrangement,
                old.and_then(|o| o.work_arrangement.clone()),
            ),
            receive_job_alerts: merge(
                &p.receive_job_alerts,
                old.and_then(|o| o.receive_job_alerts),
            ),
            alert_frequency: merge(
                &p.alert_frequency,
                old.and_then(|o| o.alert_frequency.clone()),
            ),
            updated_at: Utc::now(),
        };
        rows.insert(p.user_id.clone(), row.clone());
        Ok(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Storage
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<BTreeMap<String, Bytes>>,
    fail: bool,
}

impl FakeStorage {
    /// Every call fails with an S3 error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::S3("storage unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStorage for FakeStorage {
    async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        self.check()?;
        let path = resume_path(user_id, file_name);
        self.objects.lock().unwrap().insert(path.clone(), bytes);
        Ok(path)
    }

    async fn signed_url(&self, path: &str) -> Result<String, AppError> {
        self.check()?;
        Ok(format!("https://storage.test/resumes/{path}?signature=test"))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.check()?;
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

/// Unknown users read back as an empty record with onboarding not completed.
#[derive(Default)]
pub struct FakeIdentity {
    users: Mutex<HashMap<String, IdentityUser>>,
    calls: Mutex<Vec<String>>,
    fail_metadata: bool,
    fail_tokens: bool,
}

impl FakeIdentity {
    pub fn with_user(id: &str, full_name: Option<&str>, email: Option<&str>) -> Self {
        let identity = Self::default();
        identity.users.lock().unwrap().insert(
            id.to_string(),
            IdentityUser {
                id: id.to_string(),
                full_name: full_name.map(str::to_string),
                primary_email: email.map(str::to_string),
                ..Default::default()
            },
        );
        identity
    }

    pub fn onboarded(self, id: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_insert_with(|| IdentityUser {
                id: id.to_string(),
                ..Default::default()
            })
            .onboarding_completed = true;
        self
    }

    pub fn with_phone(self, id: &str, phone: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_insert_with(|| IdentityUser {
                id: id.to_string(),
                ..Default::default()
            })
            .phone_numbers
            .push(phone.to_string());
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    pub fn failing_tokens(mut self) -> Self {
        self.fail_tokens = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn onboarding_completed(&self, id: &str) -> bool {
        self.users
            .lock()
            .unwrap()
            .get(id)
            .is_some_and(|u| u.onboarding_completed)
    }

    fn api_error(message: &str) -> IdentityError {
        IdentityError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| IdentityUser {
                id: user_id.to_string(),
                ..Default::default()
            }))
    }

    async fn set_onboarding_completed(
        &self,
        user_id: &str,
        completed: bool,
    ) -> Result<(), IdentityError> {
        if self.fail_metadata {
            return Err(Self::api_error("metadata update failed"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(format!("set_onboarding_completed:{user_id}:{completed}"));
        self.users
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_insert_with(|| IdentityUser {
                id: user_id.to_string(),
                ..Default::default()
            })
            .onboarding_completed = completed;
        Ok(())
    }

    async fn update_name(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), IdentityError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update_name:{user_id}:{first_name} {last_name}"));
        Ok(())
    }

    async fn issue_token(
        &self,
        session_id: &str,
        template: &str,
    ) -> Result<String, IdentityError> {
        if self.fail_tokens {
            return Err(IdentityError::EmptyToken);
        }
        Ok(format!("token:{session_id}:{template}"))
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), IdentityError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("revoke_session:{session_id}"));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeApplications {
    rows: Mutex<Vec<ApplicationRow>>,
}

impl FakeApplications {
    /// Seeds a row and returns its id.
    pub fn seed(&self, user_id: &str, status: ApplicationStatus) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(ApplicationRow {
            id,
            user_id: user_id.to_string(),
            job_title: "Software Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_url: "https://jobs.example.com/1".to_string(),
            adzuna_job_id: None,
            skyvern_task_id: None,
            status: status.as_str().to_string(),
            status_details: None,
            applied_at: Some(now),
            last_status_update_at: None,
            notes: None,
            resume_url_used: None,
            cover_letter_url_used: None,
            application_source: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn row(&self, id: Uuid) -> Option<ApplicationRow> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    fn modify(
        &self,
        user_id: &str,
        id: Uuid,
        f: impl FnOnce(&mut ApplicationRow),
    ) -> Option<ApplicationRow> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)?;
        f(row);
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}

#[async_trait]
impl ApplicationRepository for FakeApplications {
    async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<&ApplicationStatus>,
    ) -> Result<Vec<ApplicationRow>, AppError> {
        let mut rows: Vec<ApplicationRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| status.map_or(true, |s| r.status == s.as_str()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(rows)
    }

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self.row(id).filter(|r| r.user_id == user_id))
    }

    async fn create(
        &self,
        user_id: &str,
        new: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        let id = self.seed(
            user_id,
            new.status.clone().unwrap_or(ApplicationStatus::Draft),
        );
        self.modify(user_id, id, |row| {
            row.job_title = new.job_title.clone();
            row.company_name = new.company_name.clone();
            row.job_url = new.job_url.clone();
            row.notes = new.notes.clone();
            row.status_details = new.status_details.clone();
        })
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    async fn update_status(
        &self,
        user_id: &str,
        id: Uuid,
        update: &StatusUpdate,
    ) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self.modify(user_id, id, |row| {
            row.status = update.status.as_str().to_string();
            if let Some(details) = &update.details {
                row.status_details = Some(details.clone());
            }
            row.last_status_update_at = Some(update.stamped_at);
        }))
    }

    async fn update_notes(
        &self,
        user_id: &str,
        id: Uuid,
        notes: &str,
    ) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self.modify(user_id, id, |row| row.notes = Some(notes.to_string())))
    }
}
