use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::info;

use crate::app_context::AppContext;
use crate::server::{build_relay_router, ServeState};

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen address; defaults to `relay.bind` from the config
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &AppContext) -> Result<()> {
    let bind = args
        .bind
        .unwrap_or_else(|| ctx.config().relay.bind.clone());
    let orchestrator = ctx.orchestrator().await?;
    let app = build_relay_router(ServeState::new(orchestrator));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(addr = %bind, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("Relay server failed")
}
