//! License document uploads.
//!
//! Accepts PDF, JPEG and PNG files up to 5 MiB and stores them under a
//! random name; the original filename is never used on disk.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{LICENSE_CONTENT_TYPES, LICENSE_UPLOAD_SUBDIR, MAX_LICENSE_BYTES};
use crate::errors::{AppError, AppResult};
use crate::infra::DocumentStorage;

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct LicenseUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Validate and store a license document, returning its public URL.
    async fn store_license(&self, upload: LicenseUpload) -> AppResult<String>;
}

pub struct LicenseUploader<S: DocumentStorage> {
    storage: Arc<S>,
}

impl<S: DocumentStorage> LicenseUploader<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: DocumentStorage> UploadService for LicenseUploader<S> {
    async fn store_license(&self, upload: LicenseUpload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::field("file", "Uploaded file is empty"));
        }
        if upload.bytes.len() > MAX_LICENSE_BYTES {
            return Err(AppError::PayloadTooLarge);
        }

        let extension = license_extension(&upload)?;
        let key = format!("{}/{}.{}", LICENSE_UPLOAD_SUBDIR, Uuid::new_v4(), extension);
        let size = upload.bytes.len();

        let url = self.storage.put(&key, upload.bytes).await?;
        tracing::info!(key = %key, size, "License document stored");
        Ok(url)
    }
}

/// Pick the stored extension from the declared content type, falling back
/// to the filename when the client sent a generic type.
fn license_extension(upload: &LicenseUpload) -> AppResult<&'static str> {
    let declared = upload
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

    if let Some(content_type) = declared.as_deref() {
        if let Some((_, ext)) = LICENSE_CONTENT_TYPES
            .iter()
            .find(|(allowed, _)| *allowed == content_type)
        {
            return Ok(*ext);
        }
        if content_type != "application/octet-stream" {
            return Err(unsupported());
        }
    }

    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match from_name.as_deref() {
        Some("pdf") => Ok("pdf"),
        Some("jpg") | Some("jpeg") => Ok("jpg"),
        Some("png") => Ok("png"),
        _ => Err(unsupported()),
    }
}

fn unsupported() -> AppError {
    AppError::field("file", "Only PDF, JPEG and PNG files are accepted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockDocumentStorage;

    fn upload(name: &str, content_type: Option<&str>, size: usize) -> LicenseUpload {
        LicenseUpload {
            file_name: Some(name.to_string()),
            content_type: content_type.map(str::to_string),
            bytes: vec![7u8; size],
        }
    }

    #[tokio::test]
    async fn test_store_pdf() {
        let mut storage = MockDocumentStorage::new();
        storage
            .expect_put()
            .withf(|key, bytes| {
                key.starts_with("licenses/") && key.ends_with(".pdf") && bytes.len() == 10
            })
            .times(1)
            .returning(|key, _| Ok(format!("http://localhost:3000/uploads/{}", key)));

        let uploader = LicenseUploader::new(Arc::new(storage));
        let url = uploader
            .store_license(upload("license.PDF", Some("application/pdf"), 10))
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:3000/uploads/licenses/"));
        assert!(!url.contains("license.PDF"));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_type() {
        let mut storage = MockDocumentStorage::new();
        storage.expect_put().never();

        let uploader = LicenseUploader::new(Arc::new(storage));
        let result = uploader
            .store_license(upload("notes.txt", Some("text/plain"), 10))
            .await;

        assert!(matches!(result, Err(AppError::InvalidFields(ref f)) if f[0].field == "file"));
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let mut storage = MockDocumentStorage::new();
        storage.expect_put().never();

        let uploader = LicenseUploader::new(Arc::new(storage));
        let result = uploader
            .store_license(upload("scan.png", Some("image/png"), MAX_LICENSE_BYTES + 1))
            .await;

        assert!(matches!(result, Err(AppError::PayloadTooLarge)));
    }

    #[test]
    fn test_extension_from_name_for_octet_stream() {
        let ext = license_extension(&upload("scan.JPEG", Some("application/octet-stream"), 1));
        assert_eq!(ext.unwrap(), "jpg");

        let ext = license_extension(&upload("scan", None, 1));
        assert!(ext.is_err());
    }
}
