use anyhow::Result;
use async_trait::async_trait;

use crate::message::{Attachment, IncomingMessage, OutgoingReply, SentMessage};

/// Handle to the messaging transport, used to answer inbound messages.
///
/// Implementations must be safe to call concurrently from any number of
/// action tasks.
#[async_trait]
pub trait Replier: Send + Sync {
    /// Reply to `to` with a text (optionally formatted, optionally with a keyboard).
    async fn reply(&self, to: &IncomingMessage, reply: OutgoingReply) -> Result<SentMessage>;

    /// Send a photo into the chat of `to`, as a reply to it.
    async fn send_photo(&self, to: &IncomingMessage, photo: Attachment) -> Result<SentMessage>;

    /// Send a document into the chat of `to`, as a reply to it.
    async fn send_document(&self, to: &IncomingMessage, document: Attachment) -> Result<SentMessage>;

    /// Delete a message previously sent by the bot.
    async fn delete_message(&self, message: SentMessage) -> Result<()>;

    /// Shorthand for a plain-text reply.
    async fn reply_text(&self, to: &IncomingMessage, text: &str) -> Result<SentMessage> {
        self.reply(to, OutgoingReply::plain(text)).await
    }
}

/// An executable unit bound to an action name.
///
/// Invoked with the transport handle, the triggering message and the command
/// rest. Any returned error (or panic) is a fault of this action only.
#[async_trait]
pub trait Action: Send + Sync {
    /// One-line description for the help listing.
    fn description(&self) -> Option<String> {
        None
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()>;
}

/// Asks the transport loop to stop receiving messages.
pub trait StopHandle: Send + Sync {
    fn request_stop(&self);
}
