use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;

use factlens_verdict_format::format_result;

use super::output::{print_json, OutputFormat};

#[derive(Args, Clone)]
pub struct FormatArgs {
    /// Saved agent response
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Print the HTML fragment instead of plain text
    #[arg(long)]
    pub html: bool,
}

pub async fn cmd_format(args: FormatArgs, output: OutputFormat) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    print_render(&raw, args.html, output)
}

pub(crate) fn print_render(raw: &str, html: bool, output: OutputFormat) -> Result<()> {
    let render = format_result(raw);
    match output {
        OutputFormat::Json => print_json(&render)?,
        OutputFormat::Human if html => println!("{}", render.to_html()),
        OutputFormat::Human => println!("{}", render.to_text()),
    }
    Ok(())
}
