mod bootstrap;
mod check_cmd;
mod drain_cmd;
mod report;
mod run_cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use remocon_config::defaults::DEFAULT_LOG_LEVEL;
use remocon_config::{config_dir, config_file_path, load_and_prepare};
use remocon_logging::init_logger;

#[derive(Parser)]
#[command(name = "remocon")]
#[command(about = "Remote-control this machine from a Telegram chat")]
#[command(version)]
struct Cli {
    /// Config file (default: $REMOCON_CONFIG_DIR/config.yaml or ~/.remocon/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Validate the config and list the registered actions without connecting
    Check,
    /// Consume pending messages without executing them
    Drain,
}

impl Commands {
    /// `check` prints config warnings itself.
    fn logs_config_warnings(self) -> bool {
        !matches!(self, Commands::Check)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(|| config_file_path(&config_dir()));

    let prepared = match load_and_prepare(&path).await {
        Ok(prepared) => prepared,
        Err(e) => {
            let _guard = init_logger(None, DEFAULT_LOG_LEVEL);
            error!(path = %path.display(), error = %format!("{e:#}"), "Failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let logging = &prepared.config.logging;
    let _guard = init_logger(
        logging.dir.as_deref(),
        logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL),
    );
    info!(path = %path.display(), "Loaded config");

    let command = cli.command.unwrap_or(Commands::Run);
    if command.logs_config_warnings() {
        prepared.log_warnings();
    }

    let result = match command {
        Commands::Run => run_cmd::run(&prepared.config).await,
        Commands::Check => check_cmd::run(&prepared),
        Commands::Drain => drain_cmd::run(&prepared.config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Fatal error");
            ExitCode::FAILURE
        }
    }
}
