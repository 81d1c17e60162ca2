//! Fixed-credential uploader for tests and local runs.

use crate::task::ports::{AssetUploadResult, AssetUploader, UploadCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Uploader returning the same unsigned credentials for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticUploader {
    issued_at: DateTime<Utc>,
}

impl StaticUploader {
    /// Signature value carried by every issued credential.
    pub const SIGNATURE: &'static str = "static-signature";

    /// Creates an uploader stamping credentials with `issued_at`.
    #[must_use]
    pub const fn new(issued_at: DateTime<Utc>) -> Self {
        Self { issued_at }
    }
}

#[async_trait]
impl AssetUploader for StaticUploader {
    async fn issue_credentials(&self, folder: &str) -> AssetUploadResult<UploadCredentials> {
        Ok(UploadCredentials {
            signature: Self::SIGNATURE.to_owned(),
            timestamp: self.issued_at,
            api_key: "static-key".to_owned(),
            cloud_name: "local".to_owned(),
            folder: folder.to_owned(),
        })
    }
}
