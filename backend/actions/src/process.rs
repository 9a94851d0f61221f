/// Subprocess runner shared by every process-backed action.
use anyhow::{bail, Context, Result};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::info;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// What to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// A string interpreted by the platform shell.
    Shell(String),
    /// Program and arguments, no shell involved.
    Argv(Vec<String>),
}

impl CommandLine {
    fn to_command(&self) -> Result<Command> {
        match self {
            CommandLine::Shell(script) => {
                let mut cmd = shell_command();
                cmd.arg(script);
                Ok(cmd)
            }
            CommandLine::Argv(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    bail!("Empty command");
                };
                let mut cmd = Command::new(program);
                cmd.args(args);
                Ok(cmd)
            }
        }
    }

    fn display(&self) -> String {
        match self {
            CommandLine::Shell(script) => script.clone(),
            CommandLine::Argv(argv) => format!("{argv:?}"),
        }
    }
}

#[cfg(unix)]
fn shell_command() -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c");
    cmd
}

#[cfg(windows)]
fn shell_command() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C");
    cmd
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Code(i32),
    /// Killed by a POSIX signal.
    Signal(i32),
    Unknown,
}

impl Termination {
    fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Signal(signal);
            }
        }
        Termination::Unknown
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Termination::Code(0))
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub termination: Termination,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run to completion with stdin closed, capturing stdout and stderr.
pub async fn run_command(line: &CommandLine) -> Result<ProcessOutput> {
    let mut cmd = line.to_command()?;
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

    info!(command = %line.display(), "Running command");
    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to start {}", line.display()))?;

    Ok(ProcessOutput {
        stdout: output.stdout,
        stderr: output.stderr,
        termination: Termination::from_status(output.status),
    })
}

/// Decode process output as UTF-8, falling back to an escaped byte literal.
pub fn decode_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => format!("b'{}'", bytes.escape_ascii()),
    }
}
