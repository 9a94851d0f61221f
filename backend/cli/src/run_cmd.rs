use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use remocon_channels::{TelegramChannel, TelegramStop};
use remocon_commands::{build_router, EntryKind, InFlight};
use remocon_config::RemoconConfig;

use crate::bootstrap::{build_registry_from_config, channel_settings, router_settings};

/// Start the bot and block until it is stopped.
///
/// After the receive loop ends, running actions are awaited until they
/// finish or a second Ctrl+C arrives.
pub async fn run(config: &RemoconConfig) -> Result<()> {
    let registry = Arc::new(build_registry_from_config(config)?);
    info!(
        actions = registry.count(EntryKind::Base),
        aliases = registry.count(EntryKind::Alias),
        "Action registry built"
    );

    let in_flight = InFlight::default();
    let settings = router_settings(config, in_flight.clone());
    info!(
        admins = settings.admins.len(),
        shutdown_public = settings.shutdown_public,
        shutdown_policy = %settings.shutdown_policy.label(),
        "Emergency shutdown configured"
    );

    let stop = Arc::new(TelegramStop::new());
    let router = Arc::new(build_router(registry, settings, stop.clone()));
    info!(routes = ?router.route_names(), "Message router ready");

    let channel = TelegramChannel::new(channel_settings(config));
    channel.run(router, stop).await?;

    wait_for_actions(&in_flight, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;
    info!("remocon stopped");
    Ok(())
}

/// Waits for running actions unless `interrupt` resolves first.
///
/// Returns how many actions were still running when it gave up.
async fn wait_for_actions(in_flight: &InFlight, interrupt: impl Future<Output = ()>) -> usize {
    if in_flight.count() == 0 {
        return 0;
    }
    info!(running = in_flight.count(), "Waiting for running actions to finish (Ctrl+C to abandon)");
    tokio::select! {
        _ = in_flight.wait_idle() => 0,
        _ = interrupt => {
            let abandoned = in_flight.count();
            warn!(abandoned, "Exiting with actions still running");
            abandoned
        }
    }
}
