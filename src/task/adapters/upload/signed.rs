//! SHA-256 request signing for direct client uploads.

use crate::task::ports::{AssetUploadError, AssetUploadResult, AssetUploader, UploadCredentials};
use async_trait::async_trait;
use mockable::Clock;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Asset host account settings.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadSignerConfig {
    /// Asset host account name.
    pub cloud_name: String,
    /// Public API key.
    pub api_key: String,
    /// Secret used to sign requests. Never leaves the server.
    pub api_secret: String,
}

impl fmt::Debug for UploadSignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSignerConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Issues signed upload parameters.
///
/// The signature is the hex-encoded SHA-256 of
/// `folder=<folder>&timestamp=<unix seconds>` followed by the secret.
#[derive(Debug, Clone)]
pub struct SignedUploadIssuer<C> {
    config: UploadSignerConfig,
    clock: Arc<C>,
}

impl<C> SignedUploadIssuer<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an issuer for the configured account.
    #[must_use]
    pub const fn new(config: UploadSignerConfig, clock: Arc<C>) -> Self {
        Self { config, clock }
    }

    fn ensure_configured(&self) -> AssetUploadResult<()> {
        if self.config.cloud_name.trim().is_empty() {
            return Err(AssetUploadError::NotConfigured("cloud_name"));
        }
        if self.config.api_key.trim().is_empty() {
            return Err(AssetUploadError::NotConfigured("api_key"));
        }
        if self.config.api_secret.is_empty() {
            return Err(AssetUploadError::NotConfigured("api_secret"));
        }
        Ok(())
    }
}

/// Computes the request signature for `folder` at `timestamp`.
#[must_use]
pub fn sign_upload(folder: &str, timestamp: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("folder={folder}&timestamp={timestamp}"));
    hasher.update(secret);
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
}

#[async_trait]
impl<C> AssetUploader for SignedUploadIssuer<C>
where
    C: Clock + Send + Sync,
{
    async fn issue_credentials(&self, folder: &str) -> AssetUploadResult<UploadCredentials> {
        self.ensure_configured()?;
        let timestamp = self.clock.utc();
        Ok(UploadCredentials {
            signature: sign_upload(folder, timestamp.timestamp(), &self.config.api_secret),
            timestamp,
            api_key: self.config.api_key.clone(),
            cloud_name: self.config.cloud_name.clone(),
            folder: folder.to_owned(),
        })
    }
}
