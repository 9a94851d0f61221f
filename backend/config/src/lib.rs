//! `remocon-config`: runtime configuration for the remocon bot.
//!
//! Provides:
//! - Typed config schema
//! - YAML loading with duplicate-key rejection and key order preserved
//! - `${ENV_VAR}` substitution in host settings
//! - Config redaction for safe display
//! - Default value application
//! - Validation report

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{substitute_env, Substituted, UnsetVariable, SUBSTITUTED_FIELDS};
pub use io::{config_dir, config_file_path, load_config, parse_yaml};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    EmergencyShutdownConfig, LoggingConfig, RemoconConfig, ScreenshotConfig, ShutdownPolicyKind,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A config that passed validation, with its warnings and the substituted
/// value tree (for redacted display).
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: RemoconConfig,
    pub warnings: Vec<ConfigValidationError>,
    pub resolved: Value,
    /// Env vars read while expanding host settings.
    pub env_vars: Vec<String>,
}

impl PreparedConfig {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, apply env substitution, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Any
/// validation error is fatal. Runs before logging is set up, so warnings are
/// returned rather than logged; see [`PreparedConfig::log_warnings`].
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let value = load_config(path).await?;
    prepare(value, &std::env::vars().collect())
}

/// The pipeline after reading: substitution, typed parse, defaults, validation.
pub fn prepare(value: Value, env: &HashMap<String, String>) -> Result<PreparedConfig> {
    let Substituted { value: resolved, variables: env_vars } = substitute_env(value, env)?;

    let config: RemoconConfig =
        serde_json::from_value(resolved.clone()).context("Invalid config")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config:\n{}", messages.join("\n"));
    }

    Ok(PreparedConfig { config, warnings: report.warnings, resolved, env_vars })
}
