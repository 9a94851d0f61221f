//! String aliases: forward to a base action with a fixed rest prefix.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use remocon_core::{Action, IncomingMessage, Replier};

use crate::normalize::command_rest;

/// Built from an alias definition like `"/shell ls -la"`.
///
/// On invocation the caller's rest is recomputed from the message text with
/// its separator kept, so `prefix + caller_rest` keeps the caller's spacing.
pub struct StringAlias {
    definition: String,
    prefix: String,
    base: Arc<dyn Action>,
}

impl StringAlias {
    pub fn new(definition: &str, base: Arc<dyn Action>) -> Self {
        Self {
            definition: definition.to_string(),
            prefix: command_rest(definition, true).to_string(),
            base,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Rest passed to the base action for a given caller message.
    pub fn expand(&self, message_text: &str) -> String {
        format!("{}{}", self.prefix, command_rest(message_text, false))
    }
}

#[async_trait]
impl Action for StringAlias {
    fn description(&self) -> Option<String> {
        Some(format!("Alias for {}", self.definition))
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, _rest: &str) -> Result<()> {
        let new_rest = self.expand(message.text());
        debug!(
            text = ?message.text(),
            prefix = ?self.prefix,
            rest = ?new_rest,
            "String alias triggered"
        );
        self.base.invoke(bot, message, &new_rest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remocon_core::testing::RecordingReplier;

    /// Echoes its rest back, wrapped in brackets so whitespace is visible.
    struct Echo;

    #[async_trait]
    impl Action for Echo {
        async fn invoke(&self, bot: &dyn Replier, msg: &IncomingMessage, rest: &str) -> Result<()> {
            bot.reply_text(msg, &format!("[{rest}]")).await?;
            Ok(())
        }
    }

    #[test]
    fn prefix_is_definition_rest() {
        let alias = StringAlias::new("/hello there", Arc::new(Echo));
        assert_eq!(alias.prefix(), "there");
        assert_eq!(StringAlias::new("/hello", Arc::new(Echo)).prefix(), "");
    }

    #[tokio::test]
    async fn prefix_then_caller_rest() {
        let bot = RecordingReplier::new();
        let alias = StringAlias::new("/hello there", Arc::new(Echo));

        let msg = IncomingMessage::new(1, 1, "/greet world");
        alias.invoke(&bot, &msg, "world").await.unwrap();

        let msg = IncomingMessage::new(1, 2, "/greet  world");
        alias.invoke(&bot, &msg, " world").await.unwrap();

        assert_eq!(bot.reply_texts(), vec!["[there world]", "[there  world]"]);
    }

    #[tokio::test]
    async fn caller_without_rest_gets_bare_prefix() {
        let bot = RecordingReplier::new();
        let alias = StringAlias::new("/shell ls -la", Arc::new(Echo));
        let msg = IncomingMessage::new(1, 1, "/ls");
        alias.invoke(&bot, &msg, "").await.unwrap();
        assert_eq!(bot.reply_texts(), vec!["[ls -la]"]);
    }

    #[test]
    fn describes_itself() {
        let alias = StringAlias::new("/hello there", Arc::new(Echo));
        assert_eq!(alias.description().as_deref(), Some("Alias for /hello there"));
    }
}
