//! User aggregate, roles, and registration approval.

use super::{
    Caller, EmailAddress, ParseApprovalStatusError, ParseRoleError, UserDomainError, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates, reviews, and reassigns tasks.
    Admin,
    /// Works on assigned tasks.
    Intern,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Intern => "intern",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "intern" => Ok(Self::Intern),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Registration approval state of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Allowed to receive and act on tasks.
    Approved,
    /// Registration was refused.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for ApprovalStatus {
    type Error = ParseApprovalStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseApprovalStatusError(value.to_owned())),
        }
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: EmailAddress,
    role: Role,
    approval: ApprovalStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted role.
    pub role: Role,
    /// Persisted approval status.
    pub approval: ApprovalStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Registers a new intern awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn register_intern(
        name: impl Into<String>,
        email: EmailAddress,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        Self::create(name.into(), email, Role::Intern, ApprovalStatus::Pending, clock)
    }

    /// Creates an administrator account. Administrators need no approval.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn new_admin(
        name: impl Into<String>,
        email: EmailAddress,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        Self::create(name.into(), email, Role::Admin, ApprovalStatus::Approved, clock)
    }

    fn create(
        name: String,
        email: EmailAddress,
        role: Role,
        approval: ApprovalStatus,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            name: trimmed.to_owned(),
            email,
            role,
            approval,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            role: data.role,
            approval: data.approval,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn approval(&self) -> ApprovalStatus {
        self.approval
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` for interns whose registration has been approved.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        self.role == Role::Intern && self.approval == ApprovalStatus::Approved
    }

    /// Returns the identity this user presents when acting.
    #[must_use]
    pub const fn as_caller(&self) -> Caller {
        Caller::new(self.id, self.role, self.approval)
    }

    /// Approves a pending intern registration.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::NotAnIntern`] for administrator accounts and
    /// [`UserDomainError::ApprovalAlreadyDecided`] when the registration is not
    /// pending.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        self.decide(ApprovalStatus::Approved, clock)
    }

    /// Rejects a pending intern registration.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::NotAnIntern`] for administrator accounts and
    /// [`UserDomainError::ApprovalAlreadyDecided`] when the registration is not
    /// pending.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        self.decide(ApprovalStatus::Rejected, clock)
    }

    fn decide(
        &mut self,
        decision: ApprovalStatus,
        clock: &impl Clock,
    ) -> Result<(), UserDomainError> {
        if self.role != Role::Intern {
            return Err(UserDomainError::NotAnIntern(self.id));
        }
        if self.approval != ApprovalStatus::Pending {
            return Err(UserDomainError::ApprovalAlreadyDecided {
                user_id: self.id,
                status: self.approval,
            });
        }
        self.approval = decision;
        self.updated_at = clock.utc();
        Ok(())
    }
}
