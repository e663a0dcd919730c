use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::storage::{content_type_for, resume_path, ResumeStorage, SIGNED_URL_TTL_SECS};

/// `ResumeStorage` backed by an S3-compatible bucket.
#[derive(Clone)]
pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let path = resume_path(user_id, file_name);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&path)
            .body(ByteStream::from(bytes))
            .content_type(content_type_for(file_name))
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Failed to upload {path}: {e}")))?;

        info!(path = %path, size, "Resume uploaded");
        Ok(path)
    }

    async fn signed_url(&self, path: &str) -> Result<String, AppError> {
        let config = PresigningConfig::expires_in(Duration::from_secs(SIGNED_URL_TTL_SECS))
            .map_err(|e| AppError::S3(format!("Invalid presigning config: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(config)
            .await
            .map_err(|e| AppError::S3(format!("Failed to sign {path}: {e}")))?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Failed to delete {path}: {e}")))?;

        info!(path = %path, "Resume deleted");
        Ok(())
    }
}
