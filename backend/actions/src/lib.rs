//! OS-level actions for remocon: shell commands, input simulation and
//! screenshots, plus the catalog that builds them from configuration.

pub mod catalog;
pub mod command;
pub mod format;
pub mod input;
pub mod notify;
pub mod process;
pub mod screenshot;
pub mod shell;

pub use catalog::{ActionCatalog, ActionDefinition, CatalogError};
pub use command::FixedCommandAction;
pub use input::{KeyAction, TypeAction};
pub use notify::{with_execution_notice, EXECUTING_NOTICE};
pub use screenshot::{default_capture_command, Delivery, ScreenshotAction};
pub use shell::{ShellAction, ShellMode};
