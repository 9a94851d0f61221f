//! Command Event Logger
//!
//! Structured command lifecycle events (dispatched, rejected, failed, ...)
//! emitted under the `command_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandEvent {
    Dispatched { action: String, invocation_id: String },
    Unauthorized,
    EmptyName,
    UnknownAction { action: String },
    Failed { error_msg: String },
    ReportFailed { error_msg: String },
    Shutdown { policy: String },
}

impl CommandEvent {
    /// Human-readable log line for this event.
    pub fn summary(&self) -> &'static str {
        match self {
            CommandEvent::Dispatched { .. } => "Action scheduled",
            CommandEvent::Unauthorized => "Message from non-admin ignored",
            CommandEvent::EmptyName => "Empty action name",
            CommandEvent::UnknownAction { .. } => "Unknown action name",
            CommandEvent::Failed { .. } => "Exception occurred while handling the command",
            CommandEvent::ReportFailed { .. } => "Failed to notify user of the above problem",
            CommandEvent::Shutdown { .. } => "Stopping due to emergency shutdown command received",
        }
    }

    fn redacted(self) -> Self {
        match self {
            CommandEvent::Failed { error_msg } => {
                CommandEvent::Failed { error_msg: redact_sensitive_data(&error_msg) }
            }
            CommandEvent::ReportFailed { error_msg } => {
                CommandEvent::ReportFailed { error_msg: redact_sensitive_data(&error_msg) }
            }
            other => other,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub chat_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub event: CommandEvent,
}

impl EventLogEntry {
    pub fn new(chat_id: i64, text: &str, event: CommandEvent) -> Self {
        Self {
            chat_id,
            text: redact_sensitive_data(text),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub struct CommandEventLogger;

impl CommandEventLogger {
    /// Logs a command event, picking the severity from its kind.
    pub fn log_event(chat_id: i64, text: &str, event: CommandEvent) {
        let entry = EventLogEntry::new(chat_id, text, event);
        let json = entry.to_json();
        let summary = entry.event.summary();
        match &entry.event {
            CommandEvent::Failed { .. } | CommandEvent::ReportFailed { .. } => {
                error!(target: "command_events", chat_id, text = %entry.text, event = %json, "{summary}");
            }
            CommandEvent::Unauthorized | CommandEvent::Shutdown { .. } => {
                warn!(target: "command_events", chat_id, text = %entry.text, event = %json, "{summary}");
            }
            _ => info!(target: "command_events", chat_id, text = %entry.text, event = %json, "{summary}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_redacts_text_and_error() {
        let entry = EventLogEntry::new(
            1,
            "/shell echo 123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw",
            CommandEvent::Failed {
                error_msg: "bad token 123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw".into(),
            },
        );
        let json = entry.to_json();
        assert!(!json.contains("AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"));
        assert!(json.contains("\"type\":\"failed\""));
    }

    #[test]
    fn non_error_events_pass_through() {
        let entry = EventLogEntry::new(1, "/foo", CommandEvent::UnknownAction { action: "foo".into() });
        assert_eq!(entry.event, CommandEvent::UnknownAction { action: "foo".into() });
    }
}
