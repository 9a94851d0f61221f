//! Drain mode: consume pending updates without acting on them.
//!
//! Used after an emergency shutdown, so that commands sent while the bot
//! was down are not executed on the next start.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::ChannelSettings;
use crate::telegram::{RetryAfterDelay, incoming_from_telegram};

/// Log every pending message and discard it. Runs until Ctrl-C.
pub async fn run_drain(settings: &ChannelSettings) -> Result<()> {
    let bot = Bot::new(settings.bot_token.clone());
    info!("Draining pending messages, press Ctrl-C to stop");

    let handler = Update::filter_message().endpoint(|msg: Message| async move {
        let incoming = incoming_from_telegram(&msg);
        warn!(chat_id = incoming.chat_id, text = incoming.text(), "Discarded pending message");
        respond(())
    });

    let listener = teloxide::update_listeners::polling_default(bot.clone()).await;
    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            std::sync::Arc::new(RetryAfterDelay { delay: settings.retry_delay }),
        )
        .await;

    info!("Drain finished");
    Ok(())
}
