//! Resume file storage. Objects live at `{user_id}/{file_name}` in the resumes
//! bucket; the profile stores that path, never a public URL.

pub mod s3;

use async_trait::async_trait;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;

pub use s3::S3ResumeStorage;

/// Signed download URLs stay valid for one hour.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;

/// Largest resume accepted.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for routes carrying a resume: the file plus room for
/// the other multipart parts.
pub const RESUME_BODY_LIMIT: usize = MAX_RESUME_BYTES + 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[async_trait]
pub trait ResumeStorage: Send + Sync {
    /// Uploads (overwriting any object at the same path) and returns the storage path.
    async fn upload(&self, user_id: &str, file_name: &str, bytes: Bytes)
        -> Result<String, AppError>;

    async fn signed_url(&self, path: &str) -> Result<String, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;
}

/// A resume file received from the client's document picker.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeUpload {
    /// Reads a multipart file field, validating the file type before any bytes are stored.
    pub async fn from_field(field: Field<'_>) -> Result<Self, AppError> {
        let file_name = field.file_name().unwrap_or_default().to_string();
        ensure_resume_file(&file_name)?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > MAX_RESUME_BYTES {
            return Err(too_large());
        }
        if bytes.is_empty() {
            return Err(AppError::Validation("The selected file is empty.".to_string()));
        }
        Ok(Self {
            file_name: file_name.trim().to_string(),
            bytes,
        })
    }
}

/// Maps a multipart read failure, reporting an oversized body as such.
pub fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::Validation(format!(
        "The selected file is too large. The limit is {} MB.",
        MAX_RESUME_BYTES / (1024 * 1024)
    ))
}

pub fn resume_path(user_id: &str, file_name: &str) -> String {
    format!("{user_id}/{file_name}")
}

/// Display name of a stored resume: the last path segment.
pub fn resume_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

pub fn content_type_for(file_name: &str) -> &'static str {
    match extension(file_name).as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Enforces the document-picker constraint (PDF / DOC / DOCX) before upload.
pub fn ensure_resume_file(file_name: &str) -> Result<(), AppError> {
    let name = file_name.trim();
    if name.is_empty()
        || name.contains('/')
        || !ALLOWED_EXTENSIONS.contains(&extension(name).as_str())
    {
        return Err(AppError::Validation(
            "Please select a PDF or Word document.".to_string(),
        ));
    }
    Ok(())
}
