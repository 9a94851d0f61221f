//! Admin gate: only allow-listed chats may run gated handlers.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use remocon_core::{IncomingMessage, Replier};
use remocon_logging::{CommandEvent, CommandEventLogger};

use crate::dispatch::MessageHandler;

pub const NOT_ADMIN_REPLY: &str = "You are not my admin. Ignored";

/// Immutable set of chat ids with elevated capability.
#[derive(Debug, Clone, Default)]
pub struct AdminSet(Arc<HashSet<i64>>);

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self(Arc::new(ids.into_iter().collect()))
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.0.contains(&chat_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Runs the inner handler for admins; everyone else gets a fixed notice.
pub struct AdminGate {
    admins: AdminSet,
    inner: Arc<dyn MessageHandler>,
}

impl AdminGate {
    pub fn wrap(admins: AdminSet, inner: Arc<dyn MessageHandler>) -> Arc<dyn MessageHandler> {
        Arc::new(Self { admins, inner })
    }
}

#[async_trait]
impl MessageHandler for AdminGate {
    async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Result<()> {
        if self.admins.contains(message.chat_id) {
            return self.inner.handle(bot, message).await;
        }
        CommandEventLogger::log_event(message.chat_id, message.text(), CommandEvent::Unauthorized);
        bot.reply_text(&message, NOT_ADMIN_REPLY).await?;
        Ok(())
    }
}
