//! remocon configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Action and alias definitions
//! stay as raw JSON values here; the action catalog interprets them so that
//! errors can name the offending key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoconConfig {
    /// Telegram bot token.
    #[serde(default)]
    pub bot_token: String,

    /// Chat ids allowed to run gated commands.
    #[serde(default)]
    pub admins: Vec<i64>,

    pub emergency_shutdown: EmergencyShutdownConfig,

    /// Reply-keyboard rows shown to admins on `/start`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_access: Vec<Vec<String>>,

    /// Raw action name -> definition, in file order.
    #[serde(default)]
    pub actions: Map<String, Value>,

    /// Raw alias name -> reference string or definition, in file order.
    #[serde(default)]
    pub aliases: Map<String, Value>,

    #[serde(default)]
    pub screenshot: ScreenshotConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seconds to wait after a failed poll before polling again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Emergency shutdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyShutdownConfig {
    /// Whole-message phrase, compared after trimming.
    pub phrase: String,

    /// Whether non-admins may trigger the shutdown. No default: the choice
    /// must be written down in the config.
    pub public: bool,

    #[serde(default)]
    pub policy: ShutdownPolicyKind,

    /// Delay before stopping under the `grace` policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownPolicyKind {
    #[default]
    Immediate,
    Grace,
}

// ---------------------------------------------------------------------------
// Misc sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotConfig {
    /// Capture program and arguments; must write a PNG to stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling JSON log; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
