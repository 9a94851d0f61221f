//! Test double for [`Replier`] that records every outbound call.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::message::{Attachment, IncomingMessage, OutgoingReply, SentMessage};
use crate::traits::Replier;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Reply { chat_id: i64, reply_to: i32, reply: OutgoingReply },
    Photo { chat_id: i64, reply_to: i32, file_name: String, size: usize },
    Document { chat_id: i64, reply_to: i32, file_name: String, size: usize },
    Delete(SentMessage),
}

#[derive(Debug)]
pub struct RecordingReplier {
    calls: Mutex<Vec<Outbound>>,
    next_id: AtomicI32,
    fail_replies: AtomicBool,
}

impl Default for RecordingReplier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingReplier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1000),
            fail_replies: AtomicBool::new(false),
        }
    }

    /// A replier whose text replies all fail (the attempt is still recorded).
    pub fn failing() -> Self {
        let replier = Self::new();
        replier.fail_replies.store(true, Ordering::SeqCst);
        replier
    }

    pub fn calls(&self) -> Vec<Outbound> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Texts of all recorded replies, in order.
    pub fn reply_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Outbound::Reply { reply, .. } => Some(reply.text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Outbound) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn sent(&self, chat_id: i64) -> SentMessage {
        SentMessage { chat_id, message_id: self.next_id.fetch_add(1, Ordering::SeqCst) }
    }
}

#[async_trait]
impl Replier for RecordingReplier {
    async fn reply(&self, to: &IncomingMessage, reply: OutgoingReply) -> Result<SentMessage> {
        self.record(Outbound::Reply { chat_id: to.chat_id, reply_to: to.message_id, reply });
        if self.fail_replies.load(Ordering::SeqCst) {
            bail!("reply rejected by test transport");
        }
        Ok(self.sent(to.chat_id))
    }

    async fn send_photo(&self, to: &IncomingMessage, photo: Attachment) -> Result<SentMessage> {
        self.record(Outbound::Photo {
            chat_id: to.chat_id,
            reply_to: to.message_id,
            file_name: photo.file_name,
            size: photo.bytes.len(),
        });
        Ok(self.sent(to.chat_id))
    }

    async fn send_document(&self, to: &IncomingMessage, document: Attachment) -> Result<SentMessage> {
        self.record(Outbound::Document {
            chat_id: to.chat_id,
            reply_to: to.message_id,
            file_name: document.file_name,
            size: document.bytes.len(),
        });
        Ok(self.sent(to.chat_id))
    }

    async fn delete_message(&self, message: SentMessage) -> Result<()> {
        self.record(Outbound::Delete(message));
        Ok(())
    }
}
