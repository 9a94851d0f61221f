//! `/help` text generation from the registry.

use tracing::warn;

use crate::registry::ActionRegistry;

/// Telegram's maximum message length.
pub const MAX_MESSAGE_LEN: usize = 4096;

pub const HELP_TOO_LARGE: &str = "The help message is too large for a Telegram message";

const NO_DESCRIPTION: &str = "[no description]";

/// One `/<name> <description>` paragraph per registry entry, in registration order.
pub fn build_help_text(registry: &ActionRegistry) -> String {
    let entries: Vec<String> = registry
        .iter()
        .map(|(name, unit)| {
            let description = unit.description().unwrap_or_else(|| NO_DESCRIPTION.to_string());
            format!("/{name} {description}")
        })
        .collect();

    let text = format!("Here is the list of actions available:\n\n{}", entries.join("\n\n"));
    if text.chars().count() > MAX_MESSAGE_LEN {
        warn!(
            len = text.chars().count(),
            "The generated /help message exceeds the maximum Telegram message size"
        );
        return HELP_TOO_LARGE.to_string();
    }
    text
}
