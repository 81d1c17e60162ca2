//! Template-driven assignment mail.

use crate::task::ports::{
    MailTransport, OutgoingMail, TaskAssignmentNotice, TaskNotifier, TaskNotifierError,
    TaskNotifierResult,
};
use async_trait::async_trait;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

/// `minijinja` templates used to render assignment mail.
///
/// Templates see `intern_name`, `title`, `description`, `priority`, and
/// `deadline` (formatted as `YYYY-MM-DD HH:MM UTC`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentTemplates {
    /// Subject line template.
    pub subject: String,
    /// HTML body template.
    pub html_body: String,
}

impl Default for AssignmentTemplates {
    fn default() -> Self {
        Self {
            subject: "New Task Assigned: {{ title }}".to_owned(),
            html_body: concat!(
                "<p>Hello {{ intern_name }},</p>\n",
                "<p>You have been assigned a new task.</p>\n",
                "<h3>{{ title }}</h3>\n",
                "<p>{{ description }}</p>\n",
                "<p><strong>Priority:</strong> {{ priority }}<br>\n",
                "<strong>Deadline:</strong> {{ deadline }}</p>\n",
                "<p>Please accept or decline within 30 minutes.</p>\n",
            )
            .to_owned(),
        }
    }
}

/// Notifier that renders assignment mail and hands it to a transport.
#[derive(Debug, Clone)]
pub struct MailTaskNotifier<T: MailTransport> {
    transport: T,
    templates: AssignmentTemplates,
}

impl<T: MailTransport> MailTaskNotifier<T> {
    /// Creates a notifier with the default templates.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_templates(transport, AssignmentTemplates::default())
    }

    /// Creates a notifier with custom templates.
    #[must_use]
    pub const fn with_templates(transport: T, templates: AssignmentTemplates) -> Self {
        Self {
            transport,
            templates,
        }
    }

    /// Renders the mail for `notice` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNotifierError::Render`] when a template fails to render.
    pub fn render(&self, notice: &TaskAssignmentNotice) -> TaskNotifierResult<OutgoingMail> {
        let environment = Environment::new();
        let ctx = context! {
            intern_name => notice.intern_name.as_str(),
            title => notice.title.as_str(),
            description => notice.description.as_str(),
            priority => notice.priority.as_str(),
            deadline => notice.deadline.format("%Y-%m-%d %H:%M UTC").to_string(),
        };
        let render = |template: &str| {
            environment
                .render_str(template, &ctx)
                .map_err(|err| TaskNotifierError::Render(err.to_string()))
        };
        Ok(OutgoingMail {
            to: notice.intern_email.clone(),
            subject: render(&self.templates.subject)?,
            html_body: render(&self.templates.html_body)?,
        })
    }
}

#[async_trait]
impl<T: MailTransport> TaskNotifier for MailTaskNotifier<T> {
    async fn send_task_assignment(&self, notice: &TaskAssignmentNotice) -> TaskNotifierResult<()> {
        let mail = self.render(notice)?;
        self.transport.send(mail).await
    }
}
