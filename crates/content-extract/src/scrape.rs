//! Request-facing wrapper: never fails, degrades to raw document text.

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::warn;

use crate::chain::{extract_document, ExtractionResult};
use crate::errors::ExtractError;
use crate::text::{raw_text, tidy_lines};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScrapeResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of [`scrape_document`]: the full extraction, or raw text plus the
/// reason extraction failed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scraped {
    Extracted(ExtractionResult),
    Degraded(ScrapeResponse),
}

impl Scraped {
    /// Text to hand to the fact-check flow.
    pub fn message_text(&self) -> String {
        match self {
            Scraped::Extracted(result) => result.to_message_text(),
            Scraped::Degraded(response) => response.text.clone(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Scraped::Extracted(_) => None,
            Scraped::Degraded(response) => response.error.as_deref(),
        }
    }

    pub fn into_response(self) -> ScrapeResponse {
        match self {
            Scraped::Extracted(result) => ScrapeResponse {
                text: result.to_message_text(),
                error: None,
            },
            Scraped::Degraded(response) => response,
        }
    }
}

/// Run the chain, degrading to the document's raw text instead of failing.
pub fn scrape_document(html: &str, url: &str) -> Scraped {
    let outcome = if html.trim().is_empty() {
        Err(ExtractError::EmptyDocument)
    } else {
        extract_document(html, url)
    };

    match outcome {
        Ok(result) => Scraped::Extracted(result),
        Err(err) => {
            warn!(error = %err, url, "extraction failed, returning raw text");
            Scraped::Degraded(ScrapeResponse {
                text: document_text(html),
                error: Some(err.to_string()),
            })
        }
    }
}

/// Extract the page, or return its raw text plus an error message.
pub fn scrape_page(html: &str, url: &str) -> ScrapeResponse {
    scrape_document(html, url).into_response()
}

fn document_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());
    let text = raw_text(root);
    if text.is_empty() {
        tidy_lines(html)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_scrape_has_no_error() {
        let resp = scrape_page("<body><p>Hello there.</p></body>", "https://example.com/");
        assert!(resp.error.is_none());
        assert!(resp.text.contains("CONTENT:\nHello there."));
    }

    #[test]
    fn bad_url_falls_back_to_raw_text() {
        let resp = scrape_page("<body><nav>Menu</nav><p>Body text</p></body>", "::nope::");
        assert!(resp.error.unwrap().starts_with("Invalid page URL"));
        assert_eq!(resp.text, "Menu Body text");
    }

    #[test]
    fn degraded_document_keeps_error_beside_text() {
        let scraped = scrape_document("<body><p>Body text</p></body>", "relative/path");
        assert!(matches!(scraped, Scraped::Degraded(_)));
        assert_eq!(scraped.message_text(), "Body text");
        assert!(scraped.error().unwrap().starts_with("Invalid page URL"));

        let json = serde_json::to_value(&scraped).unwrap();
        assert_eq!(json["text"], "Body text");
        assert!(json.get("page_meta").is_none());
    }

    #[test]
    fn blank_document_reports_empty() {
        let resp = scrape_page("   ", "https://example.com/");
        assert_eq!(resp.error.as_deref(), Some("Document is empty"));
        assert!(resp.text.is_empty());
    }

    #[test]
    fn error_field_omitted_when_ok() {
        let resp = scrape_page("<body>ok</body>", "https://example.com/");
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("error").is_none());
    }
}
