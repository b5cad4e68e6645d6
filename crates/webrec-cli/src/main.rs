//! `webrec` operator CLI.
//!
//! Works on run directories left behind by recording sessions: re-run video
//! composition, summarize what a run captured, and check the environment.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use webrec_common_async::{build_runtime, RuntimeConfig};
use webrec_common_config::{vars, Environment};

mod cli;
mod commands;
mod error;

use cli::Cli;
use error::CliError;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    // Before parsing, so `.env` values reach clap's env fallbacks too.
    let env = Environment::init();
    let cli = Cli::parse();

    init_tracing(&cli);
    if let Err(e) = env {
        warn!("environment file not fully loaded: {}", e);
    }

    let runtime = match build_runtime(RuntimeConfig::default()) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to create Tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit().into()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    cli.execute(config).await
}

fn init_tracing(cli: &Cli) {
    use webrec_common_log::{LogConfig, LogLevel};

    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet || std::env::var_os(vars::WEBREC_LOG_LEVEL).is_none() {
        config.level = LogLevel::from_verbosity(cli.verbose, cli.quiet);
    }

    let _ = webrec_common_log::init(config);
}
