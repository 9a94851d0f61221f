use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};

use anyhow::Result;
use futures::FutureExt;
use remocon_core::{IncomingMessage, Replier};
use tracing::warn;

pub const EXECUTING_NOTICE: &str = "Executing...";

/// Runs `work` between a transient "Executing..." notice and its deletion.
///
/// The notice is deleted whether `work` succeeds, fails or panics; a panic
/// is resumed after the deletion. A failed deletion is logged and does not
/// change the outcome.
pub async fn with_execution_notice<F>(bot: &dyn Replier, message: &IncomingMessage, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let notice = bot.reply_text(message, EXECUTING_NOTICE).await?;
    let outcome = AssertUnwindSafe(work).catch_unwind().await;
    if let Err(e) = bot.delete_message(notice).await {
        warn!(error = %e, "Failed to delete execution notice");
    }
    match outcome {
        Ok(result) => result,
        Err(panic) => resume_unwind(panic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use remocon_core::testing::{Outbound, RecordingReplier};
    use remocon_core::SentMessage;

    #[tokio::test]
    async fn notice_is_deleted_even_on_failure() {
        let bot = RecordingReplier::new();
        let msg = IncomingMessage::new(5, 9, "/x");

        let result = with_execution_notice(&bot, &msg, async {
            bot.reply_text(&msg, "working").await?;
            bail!("nope")
        })
        .await;
        assert!(result.is_err());

        let calls = bot.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(bot.reply_texts(), vec![EXECUTING_NOTICE, "working"]);
        assert_eq!(calls[2], Outbound::Delete(SentMessage { chat_id: 5, message_id: 1000 }));
    }

    #[tokio::test]
    async fn notice_is_deleted_before_a_panic_resumes() {
        let bot = RecordingReplier::new();
        let msg = IncomingMessage::new(5, 9, "/x");

        let unwound = AssertUnwindSafe(with_execution_notice(&bot, &msg, async {
            if bot.calls().len() == 1 {
                panic!("capture crashed");
            }
            Ok(())
        }))
        .catch_unwind()
        .await;

        assert!(unwound.is_err());
        assert_eq!(
            bot.calls().last(),
            Some(&Outbound::Delete(SentMessage { chat_id: 5, message_id: 1000 }))
        );
    }

    #[tokio::test]
    async fn work_is_skipped_when_notice_fails() {
        let bot = RecordingReplier::failing();
        let msg = IncomingMessage::new(5, 9, "/x");
        let mut ran = false;

        let result = with_execution_notice(&bot, &msg, async {
            ran = true;
            Ok(())
        })
        .await;

        assert!(result.is_err());
        assert!(!ran);
        assert_eq!(bot.reply_texts(), vec![EXECUTING_NOTICE]);
    }
}
