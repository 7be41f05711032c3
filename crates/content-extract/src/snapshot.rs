//! Page metadata captured alongside the extracted content.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

/// Headings longer than this are treated as content, not topics.
pub const MAX_HEADING_CHARS: usize = 200;

/// Budget for the rendered TOPICS line.
pub const TOPICS_DISPLAY_CHARS: usize = 300;

static TITLE: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("title").ok());
static HEADINGS: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("h1, h2, h3").ok());

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub title: String,
    pub url: String,
    pub domain: String,
    /// Distinct h1/h2/h3 texts in document order.
    pub headings: Vec<String>,
}

impl PageSnapshot {
    pub fn capture(doc: &Html, url: &Url) -> Self {
        let title = TITLE
            .as_ref()
            .and_then(|sel| doc.select(sel).next())
            .map(|el| collapse(&el.text().collect::<String>()))
            .unwrap_or_default();

        let mut headings: Vec<String> = Vec::new();
        if let Some(sel) = HEADINGS.as_ref() {
            for el in doc.select(sel) {
                let text = collapse(&el.text().collect::<String>());
                let len = text.chars().count();
                if len == 0 || len >= MAX_HEADING_CHARS {
                    continue;
                }
                if !headings.contains(&text) {
                    headings.push(text);
                }
            }
        }

        Self {
            title,
            url: url.as_str().to_string(),
            domain: url.host_str().unwrap_or_default().to_string(),
            headings,
        }
    }

    /// Headings joined with `" | "`, cut to [`TOPICS_DISPLAY_CHARS`].
    /// `None` when the page has no headings.
    pub fn topics_line(&self) -> Option<String> {
        if self.headings.is_empty() {
            return None;
        }
        let joined = self.headings.join(" | ");
        if joined.chars().count() <= TOPICS_DISPLAY_CHARS {
            return Some(joined);
        }
        let cut: String = joined.chars().take(TOPICS_DISPLAY_CHARS).collect();
        Some(format!("{}...", cut.trim_end()))
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://news.example.org/world/story?id=7").unwrap()
    }

    #[test]
    fn captures_title_domain_and_headings() {
        let doc = Html::parse_document(
            "<html><head><title>  Big   Story </title></head><body>\
             <h1>Main headline</h1><h2>Context</h2><h3>Context</h3><h4>ignored</h4>\
             </body></html>",
        );
        let snap = PageSnapshot::capture(&doc, &url());
        assert_eq!(snap.title, "Big Story");
        assert_eq!(snap.domain, "news.example.org");
        assert_eq!(snap.url, "https://news.example.org/world/story?id=7");
        assert_eq!(snap.headings, vec!["Main headline", "Context"]);
        assert_eq!(snap.topics_line().as_deref(), Some("Main headline | Context"));
    }

    #[test]
    fn overlong_headings_are_dropped() {
        let long = "word ".repeat(60);
        let doc = Html::parse_document(&format!("<body><h2>{long}</h2></body>"));
        let snap = PageSnapshot::capture(&doc, &url());
        assert!(snap.headings.is_empty());
        assert_eq!(snap.topics_line(), None);
    }

    #[test]
    fn topics_line_is_truncated() {
        let snap = PageSnapshot {
            headings: (0..40).map(|i| format!("Section heading {i}")).collect(),
            ..Default::default()
        };
        let line = snap.topics_line().unwrap();
        assert!(line.ends_with("..."));
        assert!(line.chars().count() <= TOPICS_DISPLAY_CHARS + 3);
    }
}
