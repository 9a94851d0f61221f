use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use remocon_core::StopHandle;
use teloxide::dispatching::ShutdownToken;
use tracing::{info, warn};

/// Stops the Telegram dispatcher from accepting further updates.
///
/// Created before the dispatcher exists (the router needs it), then armed
/// with the dispatcher's shutdown token. A stop requested before arming is
/// applied as soon as the token arrives.
#[derive(Default)]
pub struct TelegramStop {
    token: Mutex<Option<ShutdownToken>>,
    requested: AtomicBool,
}

impl TelegramStop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, token: ShutdownToken) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token);
        }
        if self.is_requested() {
            self.shutdown();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        let token = match self.token.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        let Some(token) = token else {
            return;
        };
        tokio::spawn(async move {
            match token.shutdown() {
                Ok(done) => {
                    done.await;
                    info!("Dispatcher stopped");
                }
                Err(e) => warn!(error = ?e, "Dispatcher is not running, nothing to stop"),
            }
        });
    }
}

impl StopHandle for TelegramStop {
    fn request_stop(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Stop requested, no further messages will be accepted");
        self.shutdown();
    }
}
