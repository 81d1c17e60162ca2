//! Domain model for users and caller identity.
//!
//! Users are either administrators or interns. Interns register in a pending
//! state and must be approved before tasks can be assigned to them or they
//! can act on tasks.

mod caller;
mod error;
mod ids;
mod user;

pub use caller::{AccessDenied, Caller};
pub use error::{ParseApprovalStatusError, ParseRoleError, UserDomainError};
pub use ids::{EmailAddress, UserId};
pub use user::{ApprovalStatus, PersistedUserData, Role, User};
