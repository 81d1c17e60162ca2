//! Issues upload credentials to the assignee of a submittable task.

use super::lifecycle::{TaskLifecycleError, TaskLifecycleResult};
use crate::intern::domain::Caller;
use crate::task::{
    domain::TaskId,
    ports::{AssetUploader, TaskRepository, UploadCredentials},
};
use std::sync::Arc;
use tracing::debug;

/// Folder prefix under which deliverables are uploaded.
pub const UPLOAD_FOLDER_PREFIX: &str = "taskmaster/submissions";

/// Hands out short-lived upload credentials for task deliverables.
#[derive(Clone)]
pub struct TaskUploadService<R, A>
where
    R: TaskRepository,
    A: AssetUploader,
{
    repository: Arc<R>,
    uploader: Arc<A>,
}

impl<R, A> TaskUploadService<R, A>
where
    R: TaskRepository,
    A: AssetUploader,
{
    /// Creates a new upload service.
    #[must_use]
    pub const fn new(repository: Arc<R>, uploader: Arc<A>) -> Self {
        Self {
            repository,
            uploader,
        }
    }

    /// Issues credentials for uploading a deliverable of `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks,
    /// [`TaskLifecycleError::Unauthorized`] for anyone but the assignee,
    /// domain errors when the task cannot currently be submitted, and
    /// [`TaskLifecycleError::Upload`] when the provider fails.
    pub async fn issue_upload_credentials(
        &self,
        caller: &Caller,
        task_id: TaskId,
    ) -> TaskLifecycleResult<UploadCredentials> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))?;
        caller.ensure_acts_for(task.assignee_id())?;
        task.ensure_can_submit()?;

        let folder = format!("{UPLOAD_FOLDER_PREFIX}/{task_id}");
        let credentials = self.uploader.issue_credentials(&folder).await?;
        debug!(task_id = %task_id, folder = %credentials.folder, "upload credentials issued");
        Ok(credentials)
    }
}
