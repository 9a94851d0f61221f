//! Turns configured action definitions into executable actions.

use std::sync::Arc;

use remocon_core::Action;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::command::FixedCommandAction;
use crate::input::{KeyAction, TypeAction};
use crate::screenshot::{default_capture_command, Delivery, ScreenshotAction};
use crate::shell::{ShellAction, ShellMode};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("The action specified by key '{key}' is not invocable: {reason}")]
    NotInvocable { key: String, reason: String },
}

fn notify_default() -> bool {
    true
}

/// One action definition, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionDefinition {
    Shell {
        #[serde(default = "notify_default")]
        notify: bool,
    },
    Run {
        #[serde(default = "notify_default")]
        notify: bool,
    },
    RawRun {
        #[serde(default = "notify_default")]
        notify: bool,
    },
    Type,
    Key,
    Screen,
    Screenf,
    Command {
        argv: Vec<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

/// Builds actions from definitions; holds settings shared between kinds.
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    capture_command: Vec<String>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new(default_capture_command())
    }
}

impl ActionCatalog {
    pub fn new(capture_command: Vec<String>) -> Self {
        Self { capture_command }
    }

    /// Parse a raw definition. `key` is only used for the error message.
    pub fn parse(&self, key: &str, value: &Value) -> Result<ActionDefinition, CatalogError> {
        if !value.is_object() {
            return Err(CatalogError::NotInvocable {
                key: key.to_string(),
                reason: format!("expected an action definition, got {value}"),
            });
        }
        ActionDefinition::deserialize(value).map_err(|e| CatalogError::NotInvocable {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn build(&self, definition: &ActionDefinition) -> Arc<dyn Action> {
        match definition {
            ActionDefinition::Shell { notify } => shell(ShellMode::Shell, *notify),
            ActionDefinition::Run { notify } => shell(ShellMode::Run, *notify),
            ActionDefinition::RawRun { notify } => shell(ShellMode::RawRun, *notify),
            ActionDefinition::Type => Arc::new(TypeAction),
            ActionDefinition::Key => Arc::new(KeyAction),
            ActionDefinition::Screen => {
                Arc::new(ScreenshotAction::new(Delivery::Photo, self.capture_command.clone()))
            }
            ActionDefinition::Screenf => {
                Arc::new(ScreenshotAction::new(Delivery::Document, self.capture_command.clone()))
            }
            ActionDefinition::Command { argv, description } => {
                Arc::new(FixedCommandAction::new(argv.clone(), description.clone()))
            }
        }
    }

    pub fn action(&self, key: &str, value: &Value) -> Result<Arc<dyn Action>, CatalogError> {
        let definition = self.parse(key, value)?;
        Ok(self.build(&definition))
    }
}

fn shell(mode: ShellMode, notify: bool) -> Arc<dyn Action> {
    Arc::new(ShellAction::new(mode, notify))
}
