//! Port for issuing short-lived upload credentials to the asset host.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Credentials a client presents to the asset host to upload one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCredentials {
    /// Hex-encoded request signature.
    pub signature: String,
    /// Instant the signature was issued; the host enforces its own expiry.
    pub timestamp: DateTime<Utc>,
    /// Public account key at the asset host.
    pub api_key: String,
    /// Asset host account name.
    pub cloud_name: String,
    /// Destination folder.
    pub folder: String,
}

/// Result type for upload credential operations.
pub type AssetUploadResult<T> = Result<T, AssetUploadError>;

/// Issues upload credentials for a destination folder.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Produces signed credentials for `folder`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetUploadError`] when credentials cannot be produced.
    async fn issue_credentials(&self, folder: &str) -> AssetUploadResult<UploadCredentials>;
}

/// Errors returned by upload credential providers.
#[derive(Debug, Clone, Error)]
pub enum AssetUploadError {
    /// The provider is missing part of its configuration.
    #[error("asset uploader is not configured: {0}")]
    NotConfigured(&'static str),

    /// The upstream provider failed.
    #[error("asset provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssetUploadError {
    /// Wraps a provider error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
