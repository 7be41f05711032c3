//! Result formatting for agent answers.
//!
//! [`format_result`] finds `Claim:`/`Statement:`/`Fact:` markers followed by a
//! verdict keyword and builds one [`Verdict`] per claim. Answers without that
//! shape fall back to paragraphs with the verdict words highlighted.

mod html;
mod parse;
mod verdict;

pub use html::{escape_html, highlight_keywords, NO_RESULTS_HTML};
pub use parse::{clean_response, format_result, render_html};
pub use verdict::{Render, Verdict, VerdictLabel};
