//! Application services for task lifecycle orchestration.

mod lifecycle;
mod upload;

pub use lifecycle::{
    CreateTaskRequest, DashboardSummary, ResponseCountdown, TaskAssignee, TaskLifecycleError,
    TaskLifecycleErrorKind, TaskLifecycleResult, TaskLifecycleService,
};
pub use upload::{TaskUploadService, UPLOAD_FOLDER_PREFIX};
