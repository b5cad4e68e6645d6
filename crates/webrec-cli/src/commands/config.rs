//! Config command implementation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use webrec_common_config::{ConfigLoader, WebrecConfig};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Manage configuration
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default `.webrec/config.yaml`
    Init {
        /// Project directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        match &self.action {
            ConfigAction::Show => show(ctx),
            ConfigAction::Init { dir, force } => init(ctx, dir.as_deref(), *force),
        }
    }
}

fn show(ctx: &CommandContext) -> Result<(), CliError> {
    if ctx.is_json() {
        return ctx.print_json(&ctx.config);
    }
    let yaml = serde_yaml::to_string(&ctx.config).map_err(anyhow::Error::from)?;
    print!("{yaml}");
    Ok(())
}

fn init(ctx: &CommandContext, dir: Option<&std::path::Path>, force: bool) -> Result<(), CliError> {
    let loader = match dir {
        Some(dir) => ConfigLoader::new(dir),
        None => ConfigLoader::default(),
    };

    let path = loader.config_path();
    if path.exists() && !force {
        return Err(CliError::validation_with_hint(
            format!("{} already exists", path.display()),
            "use --force to replace it",
        ));
    }

    let written = loader.save(&WebrecConfig::default())?;
    info!(path = %written.display(), "configuration written");
    if !ctx.quiet {
        println!("wrote {}", written.display());
    }
    Ok(())
}
