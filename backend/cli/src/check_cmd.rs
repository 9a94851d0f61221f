//! `remocon check`: validate the config offline and show what would run.

use anyhow::Result;

use remocon_commands::{build_help_text, help::HELP_TOO_LARGE, EntryKind};
use remocon_config::{collect_redacted_paths, redact, PreparedConfig};

use crate::bootstrap::{build_registry_from_config, shutdown_policy};
use crate::report::{note, render_listing, ListingRow, Tone};

pub fn run(prepared: &PreparedConfig) -> Result<()> {
    let config = &prepared.config;

    let registry = match build_registry_from_config(config) {
        Ok(registry) => registry,
        Err(e) => {
            note(Tone::Error, &e.to_string());
            return Err(e.into());
        }
    };

    for warning in &prepared.warnings {
        note(Tone::Warn, &format!("{}: {}", warning.path, warning.message));
    }

    let rows: Vec<ListingRow> = registry
        .iter()
        .map(|(name, unit)| ListingRow {
            name: format!("/{name}"),
            kind: match registry.kind(name) {
                Some(EntryKind::Alias) => "alias",
                _ => "action",
            },
            description: unit.description().unwrap_or_default(),
        })
        .collect();
    print!("{}", render_listing(&rows));

    let shutdown = &config.emergency_shutdown;
    note(Tone::Info, &format!(
        "Shutdown phrase {:?}: {}, policy {}",
        shutdown.phrase.trim(),
        if shutdown.public { "public" } else { "admins only" },
        shutdown_policy(shutdown).label()
    ));

    if !prepared.env_vars.is_empty() {
        note(Tone::Info, &format!("Env vars used: {}", prepared.env_vars.join(", ")));
    }
    let secrets = collect_redacted_paths(&prepared.resolved);
    if !secrets.is_empty() {
        note(Tone::Info, &format!("Secrets hidden below: {}", secrets.join(", ")));
    }
    println!("{}", serde_json::to_string_pretty(&redact(&prepared.resolved))?);

    if build_help_text(&registry) == HELP_TOO_LARGE {
        note(Tone::Warn, "The help listing exceeds one Telegram message and will be replaced by a notice");
    }

    note(Tone::Ok, &format!(
        "Config is valid: {} actions, {} aliases, {} admins",
        registry.count(EntryKind::Base),
        registry.count(EntryKind::Alias),
        config.admins.len()
    ));
    Ok(())
}
