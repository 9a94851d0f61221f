//! Turns a prepared config into the runtime pieces: registry, router
//! settings and channel settings.

use std::time::Duration;

use remocon_actions::ActionCatalog;
use remocon_channels::ChannelSettings;
use remocon_commands::{
    build_registry, ActionRegistry, AdminSet, AliasDefinition, InFlight, RouterSettings,
    ShutdownPolicy,
};
use remocon_config::defaults::{default_screenshot_command, DEFAULT_GRACE_MS, DEFAULT_RETRY_DELAY_SECS};
use remocon_config::{EmergencyShutdownConfig, RemoconConfig, ShutdownPolicyKind};
use remocon_core::{Action, Keyboard, RemoconError};
use serde_json::Value;
use std::sync::Arc;

/// Build the immutable registry from the `actions` and `aliases` sections.
///
/// Any non-invocable definition or registry violation is a configuration
/// error naming the offending key.
pub fn build_registry_from_config(config: &RemoconConfig) -> Result<ActionRegistry, RemoconError> {
    let capture = config.screenshot.command.clone().unwrap_or_else(default_screenshot_command);
    let catalog = ActionCatalog::new(capture);

    let mut actions: Vec<(String, Arc<dyn Action>)> = Vec::with_capacity(config.actions.len());
    for (key, value) in &config.actions {
        let action = catalog.action(key, value).map_err(config_error)?;
        actions.push((key.clone(), action));
    }

    let mut aliases = Vec::with_capacity(config.aliases.len());
    for (key, value) in &config.aliases {
        let definition = match value {
            Value::String(reference) => AliasDefinition::StringAlias(reference.clone()),
            other => AliasDefinition::CustomAlias(catalog.action(key, other).map_err(config_error)?),
        };
        aliases.push((key.clone(), definition));
    }

    build_registry(actions, aliases).map_err(config_error)
}

fn config_error(err: impl std::fmt::Display) -> RemoconError {
    RemoconError::ConfigError(err.to_string())
}

pub fn shutdown_policy(shutdown: &EmergencyShutdownConfig) -> ShutdownPolicy {
    match shutdown.policy {
        ShutdownPolicyKind::Immediate => ShutdownPolicy::Immediate,
        ShutdownPolicyKind::Grace => {
            ShutdownPolicy::Grace(Duration::from_millis(shutdown.grace_ms.unwrap_or(DEFAULT_GRACE_MS)))
        }
    }
}

pub fn router_settings(config: &RemoconConfig, in_flight: InFlight) -> RouterSettings {
    let quick_access = if config.quick_access.is_empty() {
        None
    } else {
        Some(Keyboard::resized(config.quick_access.clone()))
    };
    RouterSettings {
        admins: AdminSet::new(config.admins.iter().copied()),
        quick_access,
        shutdown_phrase: config.emergency_shutdown.phrase.clone(),
        shutdown_public: config.emergency_shutdown.public,
        shutdown_policy: shutdown_policy(&config.emergency_shutdown),
        in_flight,
    }
}

pub fn channel_settings(config: &RemoconConfig) -> ChannelSettings {
    ChannelSettings {
        bot_token: config.bot_token.clone(),
        retry_delay: Duration::from_secs(config.retry_delay_secs.unwrap_or(DEFAULT_RETRY_DELAY_SECS)),
    }
}
