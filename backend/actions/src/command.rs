use anyhow::Result;
use async_trait::async_trait;
use remocon_core::{Action, IncomingMessage, Replier};

use crate::format::reply_with_output;
use crate::process::{run_command, CommandLine};

/// A preconfigured program. Whitespace-separated words of the command rest
/// are appended as extra arguments.
pub struct FixedCommandAction {
    argv: Vec<String>,
    description: Option<String>,
}

impl FixedCommandAction {
    pub fn new(argv: Vec<String>, description: Option<String>) -> Self {
        Self { argv, description }
    }

    pub fn command_line(&self, rest: &str) -> CommandLine {
        let mut argv = self.argv.clone();
        argv.extend(rest.split_whitespace().map(str::to_string));
        CommandLine::Argv(argv)
    }
}

#[async_trait]
impl Action for FixedCommandAction {
    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()> {
        let output = run_command(&self.command_line(rest)).await?;
        reply_with_output(bot, message, &output).await
    }
}
