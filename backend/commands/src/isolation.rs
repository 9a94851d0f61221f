//! Failure isolation: no fault raised by an action may reach the dispatcher.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use tracing::{error, info};

use remocon_core::{Action, IncomingMessage, RemoconError, Replier};
use remocon_logging::{CommandEvent, CommandEventLogger};

/// Wraps an action so that its errors and panics are logged and reported
/// back to the sender instead of propagating.
///
/// `invoke` on this wrapper always returns `Ok(())`.
pub struct FailureIsolated {
    inner: Arc<dyn Action>,
}

impl FailureIsolated {
    pub fn wrap(inner: Arc<dyn Action>) -> Arc<dyn Action> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl Action for FailureIsolated {
    fn description(&self) -> Option<String> {
        self.inner.description()
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()> {
        let outcome = AssertUnwindSafe(self.inner.invoke(bot, message, rest))
            .catch_unwind()
            .await;

        let fault: anyhow::Error = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => e,
            Err(panic) => RemoconError::ActionPanicked(panic_message(panic.as_ref())).into(),
        };

        CommandEventLogger::log_event(
            message.chat_id,
            message.text(),
            CommandEvent::Failed { error_msg: format!("{fault:#}") },
        );

        let report = format!("Something went wrong while processing your request:\n{fault:#}");
        match bot.reply_text(message, &report).await {
            Ok(_) => info!("Successfully notified user of the above problem"),
            Err(e) => CommandEventLogger::log_event(
                message.chat_id,
                message.text(),
                CommandEvent::ReportFailed { error_msg: format!("{e:#}") },
            ),
        }
        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        error!("Action panicked with a non-string payload");
        "unknown panic".to_string()
    }
}
