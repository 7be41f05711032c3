use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;
use tracing::{debug, info, warn};

use factlens_content_extract::{scrape_document, Scraped};

use super::output::{print_json, OutputFormat};

#[derive(Args, Clone)]
pub struct ExtractArgs {
    /// Read the page from a saved HTML file instead of fetching it
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Page URL (fetched unless --file is given)
    #[arg(long)]
    pub url: String,
}

pub async fn cmd_extract(args: ExtractArgs, output: OutputFormat) -> Result<()> {
    let scraped = extract_page(args.file.as_ref(), &args.url).await?;
    match output {
        OutputFormat::Human => println!("{}", scraped.message_text()),
        OutputFormat::Json => print_json(&scraped)?,
    }
    Ok(())
}

/// Load the page and run the strategy chain over it. Only loading can fail;
/// extraction problems degrade to the page's raw text.
pub async fn extract_page(file: Option<&PathBuf>, url: &str) -> Result<Scraped> {
    let html = match file {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => fetch_page(url).await?,
    };
    let scraped = scrape_document(&html, url);
    match &scraped {
        Scraped::Extracted(extraction) => info!(
            strategy = %extraction.strategy,
            chars = extraction.content.chars().count(),
            degraded = extraction.is_degraded(),
            "page extracted"
        ),
        Scraped::Degraded(response) => warn!(
            error = response.error.as_deref().unwrap_or_default(),
            chars = response.text.chars().count(),
            "using raw page text"
        ),
    }
    Ok(scraped)
}

async fn fetch_page(url: &str) -> Result<String> {
    debug!(%url, "fetching page");
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("Bad status fetching {url}"))?;
    response
        .text()
        .await
        .context("Failed to read response body")
}
