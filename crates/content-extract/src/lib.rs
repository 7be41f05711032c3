//! Main-content extraction for arbitrary pages.
//!
//! Three strategies run in priority order, stopping at the first that yields
//! text:
//! 1. Container selectors scored with [`score`], global maximum wins
//! 2. Aggregated substantive paragraphs
//! 3. Visible body text of a cleaned copy of the document (always succeeds)

pub mod chain;
pub mod errors;
pub mod scorer;
pub mod scrape;
pub mod snapshot;
pub mod strategies;
pub mod text;

pub use chain::*;
pub use errors::*;
pub use scorer::*;
pub use scrape::*;
pub use snapshot::*;
pub use strategies::*;
