use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub identity_api_url: String,
    pub identity_secret_key: String,
    /// HS256 secret shared with the identity provider's JWT template.
    pub jwt_secret: String,
    /// Name of the identity provider JWT template mirrored into the backend session.
    pub jwt_template: String,
    /// Shared key the automation service presents in `X-Automation-Key`.
    /// Unset disables the automation routes.
    pub automation_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: env_or("S3_BUCKET", "resumes"),
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: env_or("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            identity_api_url: env_or("IDENTITY_API_URL", "https://api.clerk.com/v1"),
            identity_secret_key: require_env("IDENTITY_SECRET_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_template: env_or("JWT_TEMPLATE", "supabase"),
            automation_api_key: std::env::var("AUTOMATION_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
