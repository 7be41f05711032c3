//! Content extraction strategies
//!
//! Tried in fallback order by [`crate::StrategyChain`]:
//! 1. Containers - well-known article container selectors, best score wins
//! 2. Paragraphs - substantive `<p>` elements joined together
//! 3. Cleaned body - the body with navigation, ads and chrome removed

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

use crate::scorer::{score, MIN_CANDIDATE_CHARS, MIN_SEGMENT_CHARS};
use crate::text::{raw_text, visible_text};

/// Article containers probed by [`ContainerStrategy`], in order.
pub const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    ".article",
    "#article",
    ".post",
    ".post-content",
    ".story",
    ".story-body",
    "main[role=\"main\"]",
    "[role=\"article\"]",
    ".content",
    "#content",
    ".main-content",
    "#main-content",
    ".entry",
    ".entry-content",
    ".blog-post",
    ".blog-entry",
    ".article-body",
    ".article-content",
    ".news-content",
];

/// Page chrome removed by [`CleanedBodyStrategy`].
pub const REMOVAL_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    ".nav",
    ".navbar",
    ".menu",
    ".navigation",
    ".sidebar",
    ".comments",
    ".comment-section",
    ".ad",
    ".ads",
    ".advertisement",
    ".banner",
    ".social",
    ".share",
    ".sharing",
    ".social-media",
    ".related",
    ".recommended",
    ".popular",
    "script",
    "style",
    "noscript",
    "iframe",
    "form",
    ".search",
    "#search",
    "button",
];

/// Aggregated paragraphs must be longer than this.
pub const MIN_AGGREGATE_CHARS: usize = 200;

/// A paragraph needs more words than this.
pub const MIN_PARAGRAPH_WORDS: usize = 10;

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)copyright|all rights reserved|privacy policy|terms of service")
        .expect("boilerplate pattern is valid")
});

static PARAGRAPH: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("p").ok());
static BODY: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("body").ok());

/// Which strategy produced the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTier {
    ContainerSelectors,
    ParagraphAggregation,
    CleanedBody,
}

impl StrategyTier {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyTier::ContainerSelectors => "container_selectors",
            StrategyTier::ParagraphAggregation => "paragraph_aggregation",
            StrategyTier::CleanedBody => "cleaned_body",
        }
    }
}

impl fmt::Display for StrategyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text proposed by a strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentCandidate {
    pub text: String,
    pub score: f64,
    /// Container selector that matched, for tier 1 only.
    pub source_selector: Option<String>,
}

/// A single way of locating the main content of a document.
pub trait ExtractionStrategy: Send + Sync {
    fn tier(&self) -> StrategyTier;

    /// `None` when this strategy has nothing confident to offer.
    fn run(&self, doc: &Html) -> Option<ContentCandidate>;

    fn name(&self) -> &'static str {
        self.tier().name()
    }
}

/// Scores every element matched by [`CONTAINER_SELECTORS`].
pub struct ContainerStrategy {
    selectors: Vec<(String, Selector)>,
}

impl ContainerStrategy {
    pub fn new() -> Self {
        Self::with_selectors(CONTAINER_SELECTORS.iter().copied())
    }

    /// Unparseable selectors are dropped.
    pub fn with_selectors<'a>(selectors: impl IntoIterator<Item = &'a str>) -> Self {
        let selectors = selectors
            .into_iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(sel) => Some((raw.to_string(), sel)),
                Err(_) => {
                    debug!(selector = raw, "skipping invalid container selector");
                    None
                }
            })
            .collect();
        Self { selectors }
    }
}

impl Default for ContainerStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for ContainerStrategy {
    fn tier(&self) -> StrategyTier {
        StrategyTier::ContainerSelectors
    }

    fn run(&self, doc: &Html) -> Option<ContentCandidate> {
        let mut best: Option<ContentCandidate> = None;
        for (raw, selector) in &self.selectors {
            for element in doc.select(selector) {
                let text = visible_text(element);
                if text.chars().count() < MIN_CANDIDATE_CHARS {
                    continue;
                }
                let candidate_score = score(&text);
                let better = best
                    .as_ref()
                    .map_or(true, |current| candidate_score > current.score);
                if better {
                    best = Some(ContentCandidate {
                        text,
                        score: candidate_score,
                        source_selector: Some(raw.clone()),
                    });
                }
            }
        }
        if let Some(found) = &best {
            debug!(selector = ?found.source_selector, score = found.score, "container selected");
        }
        best
    }
}

/// Joins substantive, non-boilerplate paragraphs.
#[derive(Default)]
pub struct ParagraphStrategy;

impl ParagraphStrategy {
    fn is_substantive(text: &str) -> bool {
        text.chars().count() > MIN_SEGMENT_CHARS
            && text.split_whitespace().count() > MIN_PARAGRAPH_WORDS
            && !BOILERPLATE.is_match(text)
    }
}

impl ExtractionStrategy for ParagraphStrategy {
    fn tier(&self) -> StrategyTier {
        StrategyTier::ParagraphAggregation
    }

    fn run(&self, doc: &Html) -> Option<ContentCandidate> {
        let selector = PARAGRAPH.as_ref()?;
        let kept: Vec<String> = doc
            .select(selector)
            .map(|p| visible_text(p).trim().to_string())
            .filter(|text| Self::is_substantive(text))
            .collect();
        let joined = kept.join("\n\n");
        if joined.chars().count() <= MIN_AGGREGATE_CHARS {
            debug!(paragraphs = kept.len(), "paragraph aggregate too short");
            return None;
        }
        Some(ContentCandidate {
            score: score(&joined),
            text: joined,
            source_selector: None,
        })
    }
}

/// Visible text of the body after stripping [`REMOVAL_SELECTORS`] from a copy
/// of the document. The input document is never modified.
pub struct CleanedBodyStrategy {
    removals: Vec<Selector>,
}

impl CleanedBodyStrategy {
    pub fn new() -> Self {
        let removals = REMOVAL_SELECTORS
            .iter()
            .filter_map(|raw| Selector::parse(raw).ok())
            .collect();
        Self { removals }
    }

    fn cleaned_copy(&self, doc: &Html) -> Html {
        let mut copy = doc.clone();
        let ids: Vec<_> = self
            .removals
            .iter()
            .flat_map(|sel| copy.select(sel).map(|el| el.id()).collect::<Vec<_>>())
            .collect();
        for id in ids {
            if let Some(mut node) = copy.tree.get_mut(id) {
                node.detach();
            }
        }
        copy
    }
}

impl Default for CleanedBodyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for CleanedBodyStrategy {
    fn tier(&self) -> StrategyTier {
        StrategyTier::CleanedBody
    }

    fn run(&self, doc: &Html) -> Option<ContentCandidate> {
        let cleaned = self.cleaned_copy(doc);
        let body = BODY.as_ref()?;
        let mut text = cleaned
            .select(body)
            .next()
            .map(visible_text)
            .unwrap_or_default();
        if text.is_empty() {
            // everything was chrome; fall back to whatever the original body says
            text = doc
                .select(body)
                .next()
                .map(raw_text)
                .unwrap_or_default();
        }
        Some(ContentCandidate {
            score: score(&text),
            text,
            source_selector: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "Investigators confirmed on Tuesday that the bridge closure was caused \
                        by corrosion found during a routine inspection of the main span.";

    #[test]
    fn container_picks_global_maximum() {
        let html = format!(
            "<body><article><p>{LONG}</p></article>\
             <div class='content'><p>{LONG}</p><p>{LONG}</p></div></body>"
        );
        let doc = Html::parse_document(&html);
        let found = ContainerStrategy::new().run(&doc).unwrap();
        assert_eq!(found.source_selector.as_deref(), Some(".content"));
        assert!(found.text.contains("\n\n"));
    }

    #[test]
    fn container_ties_keep_first_match() {
        let html = format!(
            "<body><div class='post'><p>{LONG}</p></div><div class='story'><p>{LONG}</p></div></body>"
        );
        let doc = Html::parse_document(&html);
        let found = ContainerStrategy::new().run(&doc).unwrap();
        assert_eq!(found.source_selector.as_deref(), Some(".post"));
    }

    #[test]
    fn short_containers_are_ignored() {
        let doc = Html::parse_document("<body><article>Tiny teaser.</article></body>");
        assert!(ContainerStrategy::new().run(&doc).is_none());
    }

    #[test]
    fn paragraphs_skip_boilerplate_and_short_lines() {
        let html = format!(
            "<body><p>{LONG}</p><p>Short caption</p>\
             <p>Copyright 2024 Example Media Group, all rights reserved worldwide for every story.</p>\
             <p>{LONG}</p></body>"
        );
        let doc = Html::parse_document(&html);
        let found = ParagraphStrategy.run(&doc).unwrap();
        assert_eq!(found.text, format!("{LONG}\n\n{LONG}"));
    }

    #[test]
    fn paragraph_aggregate_must_exceed_floor() {
        let doc = Html::parse_document(&format!("<body><p>{LONG}</p></body>"));
        assert!(ParagraphStrategy.run(&doc).is_none());
    }

    #[test]
    fn cleaned_body_drops_chrome_without_touching_source() {
        let html = "<body><nav>Home | World</nav><div class='ads'>Buy now</div>\
                    <div>Council votes to extend library hours.</div>\
                    <footer>Contact us</footer><button>Share</button></body>";
        let doc = Html::parse_document(html);
        let found = CleanedBodyStrategy::new().run(&doc).unwrap();
        assert_eq!(found.text, "Council votes to extend library hours.");

        let nav = Selector::parse("nav").unwrap();
        assert_eq!(doc.select(&nav).count(), 1);
    }

    #[test]
    fn cleaned_body_falls_back_to_raw_text() {
        let doc = Html::parse_document(
            "<body><header>Only a header here</header>\
             <script>window.tracker = true;</script></body>",
        );
        let found = CleanedBodyStrategy::new().run(&doc).unwrap();
        assert_eq!(found.text, "Only a header here");
    }
}
