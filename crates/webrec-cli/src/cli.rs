//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use webrec_common_config::{ConfigLoader, WebrecConfig};

use crate::commands::{ComposeCommand, ConfigCommand, DoctorCommand, InspectCommand};
use crate::error::CliError;

/// webrec - browser session recorder
///
/// Inspect and recover the run directories written by recording sessions.
#[derive(Debug, Parser)]
#[command(
    name = "webrec",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "WEBREC_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose a run's frames into a video
    Compose(ComposeCommand),

    /// Summarize what a run captured
    Inspect(InspectCommand),

    /// Check encoder availability and configuration
    Doctor(DoctorCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Load configuration from `--config` or the current project directory
    pub fn load_config(&self) -> Result<WebrecConfig, CliError> {
        let config = match &self.config {
            Some(path) => ConfigLoader::load_file(path)?,
            None => ConfigLoader::default().load()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self, config: WebrecConfig) -> Result<(), CliError> {
        let ctx = CommandContext {
            config,
            config_path: self.config,
            format: self.format,
            quiet: self.quiet,
        };

        match self.command {
            Command::Compose(cmd) => cmd.execute(&ctx).await,
            Command::Inspect(cmd) => cmd.execute(&ctx),
            Command::Doctor(cmd) => cmd.execute(&ctx).await,
            Command::Config(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: WebrecConfig,
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a value as pretty JSON on stdout.
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<(), CliError> {
        let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
        println!("{json}");
        Ok(())
    }
}
