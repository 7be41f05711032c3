use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::commands::Commands;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, LoadedConfig};
use super::{cmd_check, cmd_extract, cmd_format, cmd_serve};
use crate::app_context::AppContext;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;
    info!("Starting FactLens v{}", env!("CARGO_PKG_VERSION"));

    let LoadedConfig { config, .. } = load_config(cli.config.as_ref()).await?;
    let ctx = AppContext::new(config);

    let outcome = dispatch(&cli, &ctx).await;
    ctx.shutdown().await;
    match outcome {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {}", err);
            Err(err)
        }
    }
}

async fn dispatch(cli: &CliArgs, ctx: &AppContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Extract(args) => cmd_extract(args, cli.output).await,
        Commands::Check(args) => cmd_check(args, ctx, cli.output).await,
        Commands::Format(args) => cmd_format(args, cli.output).await,
        Commands::Serve(args) => cmd_serve(args, ctx).await,
    }
}
