//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notifier;
pub mod repository;
pub mod uploader;

pub use notifier::{
    MailTransport, OutgoingMail, TaskAssignmentNotice, TaskNotifier, TaskNotifierError,
    TaskNotifierResult,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use uploader::{AssetUploadError, AssetUploadResult, AssetUploader, UploadCredentials};
