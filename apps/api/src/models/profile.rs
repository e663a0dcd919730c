use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Row of the `users` table. `id` is the identity provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: String,
    pub clerk_user_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    /// Storage path inside the resumes bucket, not a public URL.
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `user_preferences` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferencesRow {
    pub user_id: String,
    pub preferred_job_titles: Option<Vec<String>>,
    pub target_locations: Option<Value>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub employment_types: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub key_skills: Option<Vec<String>>,
    pub work_arrangement: Option<Vec<String>>,
    pub receive_job_alerts: Option<bool>,
    pub alert_frequency: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Profile upsert payload. `None` fields keep whatever the stored row has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpsert {
    pub id: String,
    pub clerk_user_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub resume_url: Option<String>,
}

impl ProfileUpsert {
    pub fn for_user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A preferences field as sent by the client: `None` when left out,
/// `Some(None)` when sent as `null`, `Some(Some(v))` when set.
pub type Patch<T> = Option<Option<T>>;

/// Preferences upsert payload. Present fields overwrite (a `null` clears the
/// column); omitted fields keep whatever the stored row has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesUpsert {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub preferred_job_titles: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_locations: Patch<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub salary_min: Patch<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub salary_max: Patch<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub salary_currency: Patch<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub employment_types: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub industries: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub key_skills: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub work_arrangement: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub receive_job_alerts: Patch<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub alert_frequency: Patch<String>,
}

impl PreferencesUpsert {
    /// Names of the columns this payload writes.
    pub fn present_columns(&self) -> Vec<String> {
        [
            ("preferred_job_titles", self.preferred_job_titles.is_some()),
            ("target_locations", self.target_locations.is_some()),
            ("salary_min", self.salary_min.is_some()),
            ("salary_max", self.salary_max.is_some()),
            ("salary_currency", self.salary_currency.is_some()),
            ("employment_types", self.employment_types.is_some()),
            ("industries", self.industries.is_some()),
            ("key_skills", self.key_skills.is_some()),
            ("work_arrangement", self.work_arrangement.is_some()),
            ("receive_job_alerts", self.receive_job_alerts.is_some()),
            ("alert_frequency", self.alert_frequency.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(column, _)| column.to_string())
        .collect()
    }
}

/// The value a patch writes, `None` for a cleared or omitted field.
pub fn patch_value<T>(field: &Patch<T>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
