//! Config validation: checks serde cannot express, with user-friendly messages.
//!
//! Definitions under `actions`/`aliases` are checked later, when the registry
//! is built.

use crate::schema::RemoconConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RemoconConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_transport(config, &mut report);
    validate_admins(config, &mut report);
    validate_shutdown(config, &mut report);
    validate_screenshot(config, &mut report);
    report
}

fn validate_transport(config: &RemoconConfig, report: &mut ValidationReport) {
    if config.bot_token.trim().is_empty() {
        report.error("botToken", "Telegram bot token is required");
    }
    if config.retry_delay_secs == Some(0) {
        report.warn("retryDelaySecs", "A zero retry delay polls in a tight loop while offline");
    }
}

fn validate_admins(config: &RemoconConfig, report: &mut ValidationReport) {
    if config.admins.is_empty() {
        report.warn("admins", "No admins configured; every gated action will be refused");
    }
}

fn validate_shutdown(config: &RemoconConfig, report: &mut ValidationReport) {
    let shutdown = &config.emergency_shutdown;
    if shutdown.phrase.trim().is_empty() {
        report.error("emergencyShutdown.phrase", "Shutdown phrase cannot be empty");
    }
    if shutdown.public {
        report.warn(
            "emergencyShutdown.public",
            "Anyone who knows the phrase can stop the bot",
        );
    }
}

fn validate_screenshot(config: &RemoconConfig, report: &mut ValidationReport) {
    if let Some(command) = &config.screenshot.command {
        if command.first().map_or(true, |program| program.trim().is_empty()) {
            report.error("screenshot.command", "Capture command needs a program");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;

    fn parse(yaml: &str) -> RemoconConfig {
        apply_all_defaults(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn minimal_config_is_valid() {
        let cfg = parse("botToken: t\nadmins: [1]\nemergencyShutdown: {phrase: stop, public: false}\n");
        let report = validate(&cfg);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn empty_token_and_phrase_are_errors() {
        let cfg = parse("botToken: ''\nadmins: [1]\nemergencyShutdown: {phrase: '  ', public: false}\n");
        let report = validate(&cfg);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["botToken", "emergencyShutdown.phrase"]);
    }

    #[test]
    fn empty_admins_and_public_shutdown_warn() {
        let cfg = parse("botToken: t\nemergencyShutdown: {phrase: stop, public: true}\n");
        let report = validate(&cfg);
        assert!(report.is_valid());
        let paths: Vec<&str> = report.warnings.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["admins", "emergencyShutdown.public"]);
    }

    #[test]
    fn empty_capture_command_is_error() {
        let cfg = parse(
            "botToken: t\nadmins: [1]\nemergencyShutdown: {phrase: stop, public: false}\nscreenshot: {command: []}\n",
        );
        assert!(!validate(&cfg).is_valid());
    }
}
