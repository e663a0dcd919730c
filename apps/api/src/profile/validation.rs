use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Personal-info edit submitted from the profile screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfoUpdate {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
}

impl PersonalInfoUpdate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Per-field messages; every failing field is reported, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    pub fn messages(&self) -> Vec<&str> {
        [&self.first_name, &self.email, &self.phone]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[\d\s-]{10,15}$").expect("phone pattern is valid"))
}

pub fn validate_personal_info(update: &PersonalInfoUpdate) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if update.first_name.trim().is_empty() {
        errors.first_name = Some("First name is required".to_string());
    }

    let email = update.email.trim();
    if email.is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !email.contains('@') {
        errors.email = Some("Please enter a valid email".to_string());
    }

    // Phone is optional
    let phone = update.phone.trim();
    if !phone.is_empty() && !phone_pattern().is_match(phone) {
        errors.phone = Some("Please enter a valid phone number".to_string());
    }

    errors
}
