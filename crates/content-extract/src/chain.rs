//! Strategy chain and the extraction result it produces.

use std::fmt;

use scraper::Html;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::errors::ExtractError;
use crate::snapshot::PageSnapshot;
use crate::strategies::{
    CleanedBodyStrategy, ContainerStrategy, ExtractionStrategy, ParagraphStrategy, StrategyTier,
};

/// Outcome of running the chain over one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub page_meta: PageSnapshot,
    pub content: String,
    pub strategy: StrategyTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_selector: Option<String>,
}

impl ExtractionResult {
    /// True when no structured strategy was confident and the body fallback ran.
    pub fn is_degraded(&self) -> bool {
        self.strategy == StrategyTier::CleanedBody
    }

    /// Header block followed by the content, ready to hand to the fact-check flow.
    pub fn to_message_text(&self) -> String {
        let mut out = format!("PAGE: {}\nURL: {}\n", self.page_meta.title, self.page_meta.url);
        if let Some(topics) = self.page_meta.topics_line() {
            out.push_str(&format!("TOPICS: {topics}\n"));
        }
        out.push_str("\nCONTENT:\n");
        out.push_str(self.content.trim());
        out.trim().to_string()
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message_text())
    }
}

/// Ordered list of strategies; the first non-empty candidate wins.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(ContainerStrategy::new()),
                Box::new(ParagraphStrategy),
                Box::new(CleanedBodyStrategy::new()),
            ],
        }
    }

    pub fn strategies(&self) -> impl Iterator<Item = StrategyTier> + '_ {
        self.strategies.iter().map(|s| s.tier())
    }

    #[instrument(skip_all, fields(url = %url))]
    pub fn extract(&self, doc: &Html, url: &Url) -> ExtractionResult {
        let page_meta = PageSnapshot::capture(doc, url);

        for strategy in &self.strategies {
            let Some(candidate) = strategy.run(doc) else {
                debug!(strategy = strategy.name(), "strategy yielded nothing");
                continue;
            };
            let content = candidate.text.trim();
            if content.is_empty() {
                continue;
            }
            info!(
                strategy = strategy.name(),
                chars = content.chars().count(),
                score = candidate.score,
                "content extracted"
            );
            return ExtractionResult {
                page_meta,
                content: content.to_string(),
                strategy: strategy.tier(),
                source_selector: candidate.source_selector,
            };
        }

        ExtractionResult {
            page_meta,
            content: String::new(),
            strategy: StrategyTier::CleanedBody,
            source_selector: None,
        }
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `html` and run the default chain. Fails only on a bad URL.
pub fn extract_document(html: &str, url: &str) -> Result<ExtractionResult, ExtractError> {
    let url = Url::parse(url).map_err(|err| ExtractError::InvalidUrl(format!("{url}: {err}")))?;
    let doc = Html::parse_document(html);
    Ok(StrategyChain::new().extract(&doc, &url))
}
