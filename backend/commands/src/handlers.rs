/// Built-in handlers: `/start`, `/help` and the emergency shutdown phrase.
///
/// These sit in front of the action dispatcher in the router and are not
/// part of the action registry.
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use remocon_core::{IncomingMessage, Keyboard, OutgoingReply, Replier, StopHandle};
use remocon_logging::{CommandEvent, CommandEventLogger};

use crate::dispatch::MessageHandler;
use crate::gate::AdminSet;

pub const HELLO_TEXT: &str = "Hello! I am remocon, a remote control for the device I am running on. \
     I let my admins control it through chat. The available actions are listed under /help";

// ---------------------------------------------------------------------------
// /start
// ---------------------------------------------------------------------------

/// Public greeting. Admins additionally receive the quick-access keyboard.
pub struct StartHandler {
    pub admins: AdminSet,
    pub keyboard: Option<Keyboard>,
}

#[async_trait]
impl MessageHandler for StartHandler {
    async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()> {
        let keyboard = if self.admins.contains(message.chat_id) {
            self.keyboard.clone()
        } else {
            None
        };
        bot.reply(&message, OutgoingReply::plain(HELLO_TEXT).with_keyboard(keyboard)).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

/// Replies with the help text computed once at startup.
pub struct HelpHandler {
    pub text: String,
}

#[async_trait]
impl MessageHandler for HelpHandler {
    async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()> {
        bot.reply_text(&message, &self.text).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Emergency shutdown
// ---------------------------------------------------------------------------

/// When the receive loop is told to stop after the shutdown phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Stop right away. The phrase may be redelivered on the next start
    /// because the update was never acknowledged.
    Immediate,
    /// Stop after a delay, letting the current update be acknowledged.
    Grace(Duration),
}

impl ShutdownPolicy {
    pub fn label(&self) -> String {
        match self {
            ShutdownPolicy::Immediate => "immediate".to_string(),
            ShutdownPolicy::Grace(d) => format!("grace({}ms)", d.as_millis()),
        }
    }
}

pub struct ShutdownHandler {
    pub stop: Arc<dyn StopHandle>,
    pub policy: ShutdownPolicy,
}

#[async_trait]
impl MessageHandler for ShutdownHandler {
    async fn handle(&self, _bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()> {
        CommandEventLogger::log_event(
            message.chat_id,
            message.text(),
            CommandEvent::Shutdown { policy: self.policy.label() },
        );
        match self.policy {
            ShutdownPolicy::Immediate => self.stop.request_stop(),
            ShutdownPolicy::Grace(delay) => {
                let stop = Arc::clone(&self.stop);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    info!("Grace period over; stopping");
                    stop.request_stop();
                });
            }
        }
        Ok(())
    }
}
