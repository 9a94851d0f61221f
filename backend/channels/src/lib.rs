//! Telegram transport for remocon.

pub mod drain;
pub mod stop;
pub mod telegram;

pub use drain::run_drain;
pub use stop::TelegramStop;
pub use telegram::{TelegramChannel, TelegramReplier, incoming_from_telegram};

use std::time::Duration;

/// Transport settings shared by the run and drain loops.
#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub bot_token: String,
    /// Pause after a failed long-poll request before polling again.
    pub retry_delay: Duration,
}
