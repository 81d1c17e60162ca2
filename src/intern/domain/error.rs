//! Error types for user domain validation and parsing.

use super::{ApprovalStatus, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating user values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The display name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyName,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// Approval decisions can only be taken on pending registrations.
    #[error("registration for user {user_id} is already {}", status.as_str())]
    ApprovalAlreadyDecided {
        /// User whose registration was already decided.
        user_id: UserId,
        /// Current approval status.
        status: ApprovalStatus,
    },

    /// Approval decisions only apply to intern accounts.
    #[error("user {0} is not an intern")]
    NotAnIntern(UserId),
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing approval statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown approval status: {0}")]
pub struct ParseApprovalStatusError(pub String);
