//! Domain model for the task lifecycle.
//!
//! A [`Task`] aggregate owns its time log entries and submissions. Status
//! changes are validated against [`TaskStatus::can_transition_to`], and the
//! response window is evaluated lazily against a [`LifecyclePolicy`] whenever
//! a transition is attempted.

mod error;
mod ids;
mod policy;
mod status;
mod submission;
mod task;
mod time_log;
mod title;

pub use error::{
    ParsePriorityError, ParseSubmissionKindError, ParseTaskStatusError, ParseTimeLogKindError,
    TaskDomainError,
};
pub use ids::{SubmissionId, TaskId, TimeLogId};
pub use policy::LifecyclePolicy;
pub use status::{TaskPriority, TaskStatus};
pub use submission::{NewSubmission, Submission, SubmissionKind};
pub use task::{
    NewTaskData, PersistedTaskData, RespondOutcome, ReviewDecision, Task, TaskResponse,
};
pub use time_log::{TimeLog, TimeLogKind};
pub use title::TaskTitle;
