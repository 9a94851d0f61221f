//! Keyboard input simulation through `xdotool`.

use anyhow::Result;
use async_trait::async_trait;
use remocon_core::{Action, IncomingMessage, Replier};

use crate::format::reply_with_output;
use crate::process::{run_command, CommandLine};

const XDOTOOL: &str = "xdotool";

/// `xdotool type -- <rest>`: types the rest verbatim.
pub fn type_command(text: &str) -> CommandLine {
    CommandLine::Argv(vec![XDOTOOL.into(), "type".into(), "--".into(), text.into()])
}

/// `xdotool key <keys...>`: one argument per whitespace-separated key.
pub fn key_command(keys: &str) -> CommandLine {
    let mut argv = vec![XDOTOOL.to_string(), "key".to_string()];
    argv.extend(keys.split_whitespace().map(str::to_string));
    CommandLine::Argv(argv)
}

pub struct TypeAction;

#[async_trait]
impl Action for TypeAction {
    fn description(&self) -> Option<String> {
        Some("<STRING> Type STRING on keyboard".into())
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()> {
        let output = run_command(&type_command(rest)).await?;
        reply_with_output(bot, message, &output).await
    }
}

pub struct KeyAction;

#[async_trait]
impl Action for KeyAction {
    fn description(&self) -> Option<String> {
        Some(
            "<KEYS...> Generate keypress events (e.g. `ctrl+w space`), forwarded to `xdotool key`"
                .into(),
        )
    }

    async fn invoke(&self, bot: &dyn Replier, message: &IncomingMessage, rest: &str) -> Result<()> {
        let output = run_command(&key_command(rest)).await?;
        reply_with_output(bot, message, &output).await
    }
}
