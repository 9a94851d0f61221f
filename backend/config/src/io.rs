//! Config file location and raw loading.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the remocon config directory.
/// Priority: `REMOCON_CONFIG_DIR` env > `~/.remocon/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("REMOCON_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".remocon"),
        None => PathBuf::from(".remocon"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse YAML text into a JSON value tree.
///
/// Goes through `serde_yaml::Value` first so duplicate mapping keys are
/// rejected instead of silently overwritten. Mapping order is preserved.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("Invalid YAML")?;
    let value = serde_json::to_value(yaml).context("Config is not representable as JSON")?;
    if !value.is_object() {
        bail!("Config root must be a mapping");
    }
    Ok(value)
}

/// Read and parse the config file. A missing file is an error: there is no
/// usable default without a bot token.
pub async fn load_config(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_yaml(&raw).with_context(|| format!("Failed to parse config YAML at: {}", path.display()))
}
