//! Storage for uploaded license documents.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where license documents are written.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Store `bytes` under `key` (a relative path such as
    /// `licenses/<uuid>.pdf`) and return the public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> AppResult<String>;
}

/// Writes files below a local directory served at `public_base_url/uploads`.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentStorage for LocalDiskStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> AppResult<String> {
        if key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(AppError::internal(format!("Invalid storage key: {}", key)));
        }

        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create upload dir: {}", e)))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write upload: {}", e)))?;

        tracing::debug!(path = %path.display(), "Stored document");
        Ok(format!("{}/{}", self.public_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let root = std::env::temp_dir().join(format!("hercycle-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalDiskStorage::new(&root, "http://localhost:3000/uploads/");

        let url = storage
            .put("licenses/abc.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/uploads/licenses/abc.pdf");
        let written = tokio::fs::read(root.join("licenses/abc.pdf")).await.unwrap();
        assert_eq!(written, b"%PDF-1.4");

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_put_refuses_traversal() {
        let storage = LocalDiskStorage::new(std::env::temp_dir(), "http://localhost/uploads");
        assert!(storage.put("../etc/passwd", vec![1]).await.is_err());
    }
}
