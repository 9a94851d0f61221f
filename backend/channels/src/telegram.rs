use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use teloxide::RequestError;
use teloxide::error_handlers::ErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{
    InputFile, KeyboardButton, KeyboardMarkup, MessageId, ParseMode, ReplyParameters,
};
use teloxide::update_listeners::polling_default;
use tracing::{debug, error, info};

use remocon_commands::MessageRouter;
use remocon_core::{
    Attachment, IncomingMessage, Keyboard, OutgoingReply, RemoconError, Replier, SentMessage,
    TextFormat,
};

use crate::ChannelSettings;
use crate::stop::TelegramStop;

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub fn incoming_from_telegram(msg: &Message) -> IncomingMessage {
    IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        text: msg.text().map(str::to_string),
    }
}

fn keyboard_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>());
    let markup = KeyboardMarkup::new(rows);
    if keyboard.resize { markup.resize_keyboard() } else { markup }
}

fn parse_mode(format: TextFormat) -> ParseMode {
    match format {
        TextFormat::MarkdownV2 => ParseMode::MarkdownV2,
        TextFormat::Html => ParseMode::Html,
    }
}

fn sent(msg: &Message) -> SentMessage {
    SentMessage { chat_id: msg.chat.id.0, message_id: msg.id.0 }
}

fn reply_to(to: &IncomingMessage) -> ReplyParameters {
    ReplyParameters::new(MessageId(to.message_id))
}

// ---------------------------------------------------------------------------
// Replier
// ---------------------------------------------------------------------------

/// [`Replier`] over the Telegram Bot API. `Bot` is a cheap clone around a
/// shared HTTP client, safe to use from any number of tasks.
#[derive(Clone)]
pub struct TelegramReplier {
    bot: Bot,
}

impl TelegramReplier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Replier for TelegramReplier {
    async fn reply(&self, to: &IncomingMessage, reply: OutgoingReply) -> Result<SentMessage> {
        let mut request = self
            .bot
            .send_message(ChatId(to.chat_id), reply.text)
            .reply_parameters(reply_to(to));
        if let Some(format) = reply.format {
            request = request.parse_mode(parse_mode(format));
        }
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(keyboard_markup(keyboard));
        }
        let msg = request.await.map_err(|e| RemoconError::transport("sendMessage", e))?;
        Ok(sent(&msg))
    }

    async fn send_photo(&self, to: &IncomingMessage, photo: Attachment) -> Result<SentMessage> {
        let file = InputFile::memory(photo.bytes).file_name(photo.file_name);
        let msg = self
            .bot
            .send_photo(ChatId(to.chat_id), file)
            .reply_parameters(reply_to(to))
            .await
            .map_err(|e| RemoconError::transport("sendPhoto", e))?;
        Ok(sent(&msg))
    }

    async fn send_document(&self, to: &IncomingMessage, document: Attachment) -> Result<SentMessage> {
        let file = InputFile::memory(document.bytes).file_name(document.file_name);
        let msg = self
            .bot
            .send_document(ChatId(to.chat_id), file)
            .reply_parameters(reply_to(to))
            .await
            .map_err(|e| RemoconError::transport("sendDocument", e))?;
        Ok(sent(&msg))
    }

    async fn delete_message(&self, message: SentMessage) -> Result<()> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await
            .map_err(|e| RemoconError::transport("deleteMessage", e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Polling error handler
// ---------------------------------------------------------------------------

/// Logs a failed long-poll request and holds the listener back for the
/// configured delay before it polls again.
pub(crate) struct RetryAfterDelay {
    pub(crate) delay: std::time::Duration,
}

impl ErrorHandler<RequestError> for RetryAfterDelay {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            error!(
                error = %error,
                "Having internet connection issues. Retrying in {} seconds...",
                self.delay.as_secs()
            );
            tokio::time::sleep(self.delay).await;
            info!("Restarted");
        })
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// The long-poll receive loop feeding the message router.
pub struct TelegramChannel {
    bot: Bot,
    settings: ChannelSettings,
}

impl TelegramChannel {
    pub fn new(settings: ChannelSettings) -> Self {
        Self { bot: Bot::new(settings.bot_token.clone()), settings }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    /// Receive messages until `stop` is triggered (or Ctrl-C).
    ///
    /// Each message is routed on the receive loop; the router schedules
    /// actions on their own tasks and returns immediately.
    pub async fn run(&self, router: Arc<MessageRouter>, stop: Arc<TelegramStop>) -> Result<()> {
        info!("Starting Telegram channel");

        let handler = Update::filter_message().endpoint(
            |bot: Bot, msg: Message, router: Arc<MessageRouter>| async move {
                let incoming = incoming_from_telegram(&msg);
                debug!(chat_id = incoming.chat_id, message_id = incoming.message_id, "Received message");
                let replier: Arc<dyn Replier> = Arc::new(TelegramReplier::new(bot));
                router.handle(replier, incoming).await;
                respond(())
            },
        );

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![router])
            .default_handler(|update| async move {
                debug!(update_id = ?update.id, "Ignoring non-message update");
            })
            .enable_ctrlc_handler()
            .build();
        stop.arm(dispatcher.shutdown_token());

        let listener = polling_default(self.bot.clone()).await;
        let on_poll_error = Arc::new(RetryAfterDelay { delay: self.settings.retry_delay });
        dispatcher.dispatch_with_listener(listener, on_poll_error).await;

        info!(stop_requested = stop.is_requested(), "Telegram channel stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_rows_are_preserved() {
        let keyboard = Keyboard::resized(vec![
            vec!["/screen".into(), "/screenf".into()],
            vec!["/help".into()],
        ]);
        let markup = keyboard_markup(&keyboard);

        let labels: Vec<Vec<&str>> = markup
            .keyboard
            .iter()
            .map(|row| row.iter().map(|b| b.text.as_str()).collect())
            .collect();
        assert_eq!(labels, vec![vec!["/screen", "/screenf"], vec!["/help"]]);
        assert!(markup.resize_keyboard);

        let plain = keyboard_markup(&Keyboard { rows: vec![], resize: false });
        assert!(!plain.resize_keyboard);
    }

    #[test]
    fn formats_map_to_parse_modes() {
        assert_eq!(parse_mode(TextFormat::MarkdownV2), ParseMode::MarkdownV2);
        assert_eq!(parse_mode(TextFormat::Html), ParseMode::Html);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_errors_back_off_for_the_retry_delay() {
        let handler = Arc::new(RetryAfterDelay { delay: std::time::Duration::from_secs(3) });
        let started = tokio::time::Instant::now();

        handler.handle_error(RequestError::Api(teloxide::ApiError::BotBlocked)).await;

        assert!(started.elapsed() >= std::time::Duration::from_secs(3));
    }
}
