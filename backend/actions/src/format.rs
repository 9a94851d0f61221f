//! MarkdownV2 rendering of process results.

use anyhow::Result;
use remocon_core::{IncomingMessage, OutgoingReply, Replier};
use tracing::warn;

use crate::process::{decode_output, ProcessOutput, Termination};

/// Escape text for use inside a MarkdownV2 pre/code block.
///
/// Only `\` and `` ` `` are special there.
pub fn escape_code_block(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '`' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn termination_line(termination: Termination) -> String {
    match termination {
        Termination::Code(code) => format!("Exit code: {code}"),
        Termination::Signal(signal) => format!("Exited due to signal {signal}"),
        Termination::Unknown => "Exit status unknown".to_string(),
    }
}

fn termination_code(termination: Termination) -> String {
    match termination {
        Termination::Code(code) => code.to_string(),
        Termination::Signal(signal) => format!("-{signal}"),
        Termination::Unknown => "unknown".to_string(),
    }
}

/// Full MarkdownV2 report: empty streams are omitted.
pub fn render_output(output: &ProcessOutput) -> String {
    let mut text = String::from("Done\\. Output:\n");
    for (label, stream) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
        if stream.is_empty() {
            continue;
        }
        text.push_str(label);
        text.push_str(":\n```\n");
        text.push_str(&escape_code_block(&decode_output(stream)));
        text.push_str("\n```\n");
    }
    text.push_str(&termination_line(output.termination));
    text
}

/// Send the report; when that fails, fall back to a short plain-text notice.
pub async fn reply_with_output(
    bot: &dyn Replier,
    message: &IncomingMessage,
    output: &ProcessOutput,
) -> Result<()> {
    let report = OutgoingReply::markdown_v2(render_output(output));
    if let Err(e) = bot.reply(message, report).await {
        warn!(error = %e, "Failed to send command output");
        let fallback = format!(
            "The command has completed with code {}, but I failed to send the response:\n{e:#}",
            termination_code(output.termination)
        );
        bot.reply_text(message, &fallback).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, termination: Termination) -> ProcessOutput {
        ProcessOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            termination,
        }
    }

    #[test]
    fn escapes_backslash_and_backtick() {
        assert_eq!(escape_code_block(r"a\b`c"), r"a\\b\`c");
        assert_eq!(escape_code_block("*_[]"), "*_[]");
    }

    #[test]
    fn renders_streams_and_exit_code() {
        let text = render_output(&output("hi\n", "", Termination::Code(0)));
        assert_eq!(text, "Done\\. Output:\nstdout:\n```\nhi\n\n```\nExit code: 0");
    }

    #[test]
    fn renders_signal() {
        let text = render_output(&output("", "boom", Termination::Signal(9)));
        assert_eq!(text, "Done\\. Output:\nstderr:\n```\nboom\n```\nExited due to signal 9");
    }

    #[tokio::test]
    async fn falls_back_to_plain_text() {
        use remocon_core::testing::RecordingReplier;

        let bot = RecordingReplier::failing();
        let msg = IncomingMessage::new(1, 2, "/shell true");
        // The fallback reply fails too, so the error surfaces.
        let result = reply_with_output(&bot, &msg, &output("", "", Termination::Code(4))).await;
        assert!(result.is_err());

        let texts = bot.reply_texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[1].starts_with(
            "The command has completed with code 4, but I failed to send the response:\n"
        ));
    }
}
