use anyhow::Result;

use remocon_channels::run_drain;
use remocon_config::RemoconConfig;

use crate::bootstrap::channel_settings;
use crate::report::{note, Tone};

/// Discard every pending message. Meant for the first start after an
/// emergency shutdown.
pub async fn run(config: &RemoconConfig) -> Result<()> {
    note(Tone::Warn, "Drain mode: pending messages are logged and discarded, nothing is executed");
    run_drain(&channel_settings(config)).await
}
