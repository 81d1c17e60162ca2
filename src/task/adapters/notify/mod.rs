//! Assignment notification adapters.

mod logging;
mod mail;

pub use logging::LoggingMailTransport;
pub use mail::{AssignmentTemplates, MailTaskNotifier};
