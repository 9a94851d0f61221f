/// Shell-style actions: `shell`, `run` and `rawrun`.
///
/// All three execute the command rest and reply with the captured output.
/// They differ only in how the rest becomes a command line. With `notify`
/// on, the "Executing..." notice covers the process run only, so a `run`
/// rest that fails to parse is answered without one.
use anyhow::Result;
use async_trait::async_trait;
use remocon_core::{Action, IncomingMessage, Replier};

use crate::format::reply_with_output;
use crate::notify::with_execution_notice;
use crate::process::{run_command, CommandLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    /// Interpret the rest with the platform shell.
    Shell,
    /// Split the rest with POSIX quoting rules, no shell.
    Run,
    /// Split the rest on whitespace, no quoting.
    RawRun,
}

impl ShellMode {
    fn description(&self) -> &'static str {
        match self {
            ShellMode::Shell => "<COMMAND> Run command in default shell",
            ShellMode::Run => {
                "<COMMAND> Run command outside of shell (quoting and escaping is supported)"
            }
            ShellMode::RawRun => {
                "<COMMAND> Run command outside of shell (split by space, no quoting or escaping)"
            }
        }
    }
}

pub struct ShellAction {
    mode: ShellMode,
    notify: bool,
}

impl ShellAction {
    pub fn new(mode: ShellMode, notify: bool) -> Self {
        Self { mode, notify }
    }

    async fn execute(&self, bot: &dyn Replier, message: &IncomingMessage, line: CommandLine) -> Result<()> {
        if self.notify {
            with_execution_notice(bot, message, Box::pin(self.execute(bot, message, line))).await
        } else {
            Box::pin(self.execute(bot, message, line)).await
        }
    }
}

#[async_trait]
impl Action for ShellAction {
    fn description(&self) -> Option<String> {
        Some(self.mode.description().to_string())
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()> {
        let line = match self.mode {
            ShellMode::Shell => CommandLine::Shell(rest.to_string()),
            ShellMode::RawRun => {
                CommandLine::Argv(rest.split_whitespace().map(str::to_string).collect())
            }
            ShellMode::Run => match shell_words::split(rest) {
                Ok(argv) => CommandLine::Argv(argv),
                Err(e) => {
                    bot.reply_text(message, &format!("Failed to parse arguments:\n{e}")).await?;
                    return Ok(());
                }
            },
        };

        let output = run_command(&line).await?;
        reply_with_output(bot, message, &output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remocon_core::testing::{Outbound, RecordingReplier};
    use remocon_core::TextFormat;

    fn msg() -> IncomingMessage {
        IncomingMessage::new(3, 30, "/x")
    }

    #[tokio::test]
    async fn run_reports_parse_errors() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::Run, false).invoke(&bot, &msg(), "echo 'unterminated").await.unwrap();
        let texts = bot.reply_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("Failed to parse arguments:\n"));
    }

    #[tokio::test]
    async fn parse_error_is_answered_without_notice() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::Run, true).invoke(&bot, &msg(), "echo \"open").await.unwrap();
        let texts = bot.reply_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("Failed to parse arguments:\n"));
        assert!(!bot.calls().iter().any(|c| matches!(c, Outbound::Delete(_))));
    }

    #[tokio::test]
    async fn rawrun_without_program_fails() {
        let bot = RecordingReplier::new();
        let result = ShellAction::new(ShellMode::RawRun, false).invoke(&bot, &msg(), "   ").await;
        assert!(result.is_err());
        assert!(bot.calls().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_replies_with_markdown_output() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::Shell, false).invoke(&bot, &msg(), "printf 'a`b'").await.unwrap();
        match &bot.calls()[0] {
            Outbound::Reply { reply, reply_to, .. } => {
                assert_eq!(*reply_to, 30);
                assert_eq!(reply.format, Some(TextFormat::MarkdownV2));
                assert_eq!(reply.text, "Done\\. Output:\nstdout:\n```\na\\`b\n```\nExit code: 0");
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_honours_quoting() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::Run, false).invoke(&bot, &msg(), "printf '%s|' 'a b' c").await.unwrap();
        assert!(bot.reply_texts()[0].contains("a b|c|"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn rawrun_splits_on_spaces_only() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::RawRun, false).invoke(&bot, &msg(), "printf %s| 'a b'").await.unwrap();
        assert!(bot.reply_texts()[0].contains("'a|b'|"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn notice_wraps_the_process_run() {
        let bot = RecordingReplier::new();
        ShellAction::new(ShellMode::Shell, true).invoke(&bot, &msg(), "echo hi").await.unwrap();
        let texts = bot.reply_texts();
        assert_eq!(texts[0], crate::notify::EXECUTING_NOTICE);
        assert!(texts[1].contains("hi"));
        assert!(matches!(bot.calls().last(), Some(Outbound::Delete(_))));
    }
}
