//! Caller identity supplied by the session layer.

use super::{ApprovalStatus, Role, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of the user invoking an operation.
///
/// The session layer authenticates the user and hands this value to every
/// service call; services never look identity up from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    user_id: UserId,
    role: Role,
    approval: ApprovalStatus,
}

/// Reasons a caller may be refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessDenied {
    /// The operation requires the administrator role.
    #[error("user {0} is not an administrator")]
    AdminRequired(UserId),

    /// The operation requires an approved intern.
    #[error("user {0} is not an approved intern")]
    ApprovedInternRequired(UserId),

    /// An intern attempted to act on another intern's task.
    #[error("user {caller} may not act for user {owner}")]
    NotOwner {
        /// Acting user.
        caller: UserId,
        /// Owner of the resource.
        owner: UserId,
    },
}

impl Caller {
    /// Creates a caller identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role, approval: ApprovalStatus) -> Self {
        Self {
            user_id,
            role,
            approval,
        }
    }

    /// Shorthand for an administrator identity.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin, ApprovalStatus::Approved)
    }

    /// Shorthand for an approved intern identity.
    #[must_use]
    pub const fn intern(user_id: UserId) -> Self {
        Self::new(user_id, Role::Intern, ApprovalStatus::Approved)
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the acting user's approval status.
    #[must_use]
    pub const fn approval(&self) -> ApprovalStatus {
        self.approval
    }

    /// Returns `true` when the caller is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Requires the administrator role.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::AdminRequired`] otherwise.
    pub fn ensure_admin(&self) -> Result<(), AccessDenied> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessDenied::AdminRequired(self.user_id))
        }
    }

    /// Requires an approved intern acting on a resource they own.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied::ApprovedInternRequired`] for administrators and
    /// unapproved interns, and [`AccessDenied::NotOwner`] when `owner` is a
    /// different user.
    pub fn ensure_acts_for(&self, owner: UserId) -> Result<(), AccessDenied> {
        if self.role != Role::Intern || self.approval != ApprovalStatus::Approved {
            return Err(AccessDenied::ApprovedInternRequired(self.user_id));
        }
        if self.user_id != owner {
            return Err(AccessDenied::NotOwner {
                caller: self.user_id,
                owner,
            });
        }
        Ok(())
    }

    /// Allows administrators, or the owning intern, to read a resource.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessDenied`] reason from [`Self::ensure_acts_for`] when
    /// the caller is not an administrator.
    pub fn ensure_can_view(&self, owner: UserId) -> Result<(), AccessDenied> {
        if self.is_admin() {
            return Ok(());
        }
        self.ensure_acts_for(owner)
    }
}
