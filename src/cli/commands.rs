use clap::Subcommand;

use super::check::CheckArgs;
use super::extract::ExtractArgs;
use super::format::FormatArgs;
use super::serve::ServeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Extract the main content of a page
    Extract(ExtractArgs),

    /// Extract a page and fact-check it through the chat agent
    Check(CheckArgs),

    /// Render a saved agent response
    Format(FormatArgs),

    /// Run the fact-check relay server
    Serve(ServeArgs),
}
