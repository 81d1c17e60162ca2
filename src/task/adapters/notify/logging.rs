//! Transport that records mail in the trace log instead of delivering it.

use crate::task::ports::{MailTransport, OutgoingMail, TaskNotifierResult};
use async_trait::async_trait;
use tracing::info;

/// Mail transport that logs each message at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, mail: OutgoingMail) -> TaskNotifierResult<()> {
        info!(to = %mail.to, subject = %mail.subject, "assignment mail queued");
        Ok(())
    }
}
