use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use factlens_orchestrator::{save_credentials, CredentialBundle, FactCheckStatus};

use super::extract::extract_page;
use super::format::print_render;
use super::output::OutputFormat;
use crate::app_context::AppContext;

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Read the page from a saved HTML file instead of fetching it
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Page URL (fetched unless --file is given)
    #[arg(long)]
    pub url: String,

    /// Access token; overrides the stored credentials
    #[arg(long, env = "FACTLENS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Also save --token to the store for later runs
    #[arg(long, requires = "token")]
    pub remember: bool,

    /// Print the HTML fragment instead of plain text
    #[arg(long)]
    pub html: bool,
}

pub async fn cmd_check(args: CheckArgs, ctx: &AppContext, output: OutputFormat) -> Result<()> {
    let scraped = extract_page(args.file.as_ref(), &args.url).await?;
    let bundle = args.token.map(CredentialBundle::from_token);
    if let (Some(bundle), true) = (&bundle, args.remember) {
        save_credentials(ctx.store().as_ref(), bundle)
            .await
            .context("Failed to save credentials")?;
        info!("credentials saved");
    }

    let orchestrator = ctx.orchestrator().await?;
    let mut status = orchestrator.add_status_listener();
    let watcher = tokio::spawn(async move {
        while let Some(update) = status.next().await {
            match update {
                FactCheckStatus::Error { message } => warn!(%message, "fact-check status"),
                other => info!(status = ?other, "fact-check status"),
            }
        }
    });

    let outcome = orchestrator
        .check_text(&scraped.message_text(), bundle.as_ref())
        .await;
    watcher.abort();

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            if err.is_retryable() {
                warn!(error = %err, "transient failure, trying again may succeed");
            }
            return Err(err).context("Fact-check failed");
        }
    };
    print_render(&result, args.html, output)
}
