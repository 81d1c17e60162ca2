//! Upload credential adapters.

mod fixed;
mod signed;

pub use fixed::StaticUploader;
pub use signed::{SignedUploadIssuer, UploadSignerConfig, sign_upload};
