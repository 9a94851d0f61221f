//! Config defaults: fills optional fields after parsing.

use crate::schema::RemoconConfig;

/// Delay before stopping under the `grace` shutdown policy.
pub const DEFAULT_GRACE_MS: u64 = 100;

/// Pause between failed long-poll attempts.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 3;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ImageMagick `import`, whole root window, PNG on stdout.
pub fn default_screenshot_command() -> Vec<String> {
    ["import", "-window", "root", "png:-"].iter().map(|s| s.to_string()).collect()
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: RemoconConfig) -> RemoconConfig {
    let config = apply_shutdown_defaults(config);
    let config = apply_screenshot_defaults(config);
    let config = apply_logging_defaults(config);
    apply_transport_defaults(config)
}

fn apply_shutdown_defaults(mut config: RemoconConfig) -> RemoconConfig {
    let shutdown = &mut config.emergency_shutdown;
    if shutdown.grace_ms.is_none() {
        shutdown.grace_ms = Some(DEFAULT_GRACE_MS);
    }
    config
}

fn apply_screenshot_defaults(mut config: RemoconConfig) -> RemoconConfig {
    if config.screenshot.command.is_none() {
        config.screenshot.command = Some(default_screenshot_command());
    }
    config
}

fn apply_logging_defaults(mut config: RemoconConfig) -> RemoconConfig {
    if config.logging.level.is_none() {
        config.logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

fn apply_transport_defaults(mut config: RemoconConfig) -> RemoconConfig {
    if config.retry_delay_secs.is_none() {
        config.retry_delay_secs = Some(DEFAULT_RETRY_DELAY_SECS);
    }
    config
}
