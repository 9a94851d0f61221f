//! Screen capture actions.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use remocon_core::{Action, Attachment, IncomingMessage, Replier};
use tracing::warn;

use crate::process::{decode_output, run_command, CommandLine};

pub const SCREENSHOT_FILE_NAME: &str = "i.png";

/// Default capture program: ImageMagick writing PNG to stdout.
pub fn default_capture_command() -> Vec<String> {
    ["import", "-window", "root", "png:-"].iter().map(|s| s.to_string()).collect()
}

/// How the capture is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Compressed photo.
    Photo,
    /// Uncompressed file.
    Document,
}

/// Runs the capture command and sends its stdout as a PNG.
pub struct ScreenshotAction {
    delivery: Delivery,
    capture: Vec<String>,
}

impl ScreenshotAction {
    pub fn new(delivery: Delivery, capture: Vec<String>) -> Self {
        Self { delivery, capture }
    }

    async fn capture(&self) -> Result<Vec<u8>> {
        let output = run_command(&CommandLine::Argv(self.capture.clone())).await?;
        if !output.termination.is_success() {
            return Err(anyhow!(
                "capture command exited with {:?}: {}",
                output.termination,
                decode_output(&output.stderr).trim_end()
            ));
        }
        if output.stdout.is_empty() {
            return Err(anyhow!("capture command produced no image"));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl Action for ScreenshotAction {
    fn description(&self) -> Option<String> {
        Some(match self.delivery {
            Delivery::Photo => "Capture screen and send the screenshot as a photo".into(),
            Delivery::Document => "Capture screen and send the screenshot as a file".into(),
        })
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, _rest: &str) -> Result<()> {
        let image = match self.capture().await {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Screen capture failed");
                let text = format!("Error: your machine doesn't seem to support this:\n{e:#}");
                bot.reply_text(message, &text).await?;
                return Ok(());
            }
        };

        let attachment = Attachment::new(SCREENSHOT_FILE_NAME, image);
        match self.delivery {
            Delivery::Photo => bot.send_photo(message, attachment).await?,
            Delivery::Document => bot.send_document(message, attachment).await?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remocon_core::testing::{Outbound, RecordingReplier};

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn missing_capture_tool_is_reported() {
        let bot = RecordingReplier::new();
        let msg = IncomingMessage::new(1, 2, "/screen");
        let action = ScreenshotAction::new(Delivery::Photo, argv(&["no-such-capture-tool-xyz"]));

        action.invoke(&bot, &msg, "").await.unwrap();
        let texts = bot.reply_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("Error: your machine doesn't seem to support this:\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sends_photo_or_document() {
        let msg = IncomingMessage::new(1, 2, "/screen");

        let bot = RecordingReplier::new();
        ScreenshotAction::new(Delivery::Photo, argv(&["printf", "PNGDATA"]))
            .invoke(&bot, &msg, "")
            .await
            .unwrap();
        assert_eq!(
            bot.calls(),
            vec![Outbound::Photo { chat_id: 1, reply_to: 2, file_name: "i.png".into(), size: 7 }]
        );

        let bot = RecordingReplier::new();
        ScreenshotAction::new(Delivery::Document, argv(&["printf", "PNG"]))
            .invoke(&bot, &msg, "")
            .await
            .unwrap();
        assert_eq!(
            bot.calls(),
            vec![Outbound::Document { chat_id: 1, reply_to: 2, file_name: "i.png".into(), size: 3 }]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_capture_is_reported() {
        let bot = RecordingReplier::new();
        let msg = IncomingMessage::new(1, 2, "/screen");
        ScreenshotAction::new(Delivery::Photo, argv(&["sh", "-c", "echo no display >&2; exit 1"]))
            .invoke(&bot, &msg, "")
            .await
            .unwrap();
        assert!(bot.reply_texts()[0].contains("no display"));
    }
}
