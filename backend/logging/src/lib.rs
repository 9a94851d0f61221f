//! Structured logging components for remocon.
//!
//! Handles log redaction, console + rolling JSON output, and command lifecycle events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CommandEvent, CommandEventLogger, EventLogEntry};
pub use logger::{LoggerGuard, init_logger};
pub use redact::redact_sensitive_data;
