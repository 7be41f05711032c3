use std::fmt;

use serde::Serialize;

use crate::html::{escape_html, highlight_keywords, NO_RESULTS_HTML};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerdictLabel {
    True,
    False,
    #[serde(rename = "Partially True")]
    PartiallyTrue,
    Unknown,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::True => "True",
            VerdictLabel::False => "False",
            VerdictLabel::PartiallyTrue => "Partially True",
            VerdictLabel::Unknown => "Unknown",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            VerdictLabel::True => "verdict-true",
            VerdictLabel::False => "verdict-false",
            VerdictLabel::PartiallyTrue => "verdict-partial",
            VerdictLabel::Unknown => "verdict-unknown",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub claim_text: String,
    pub label: VerdictLabel,
    pub explanation: String,
}

/// Parsed answer, ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Render {
    Structured(Vec<Verdict>),
    Paragraphs(Vec<String>),
    Empty,
}

impl Render {
    pub fn to_html(&self) -> String {
        let body = match self {
            Render::Empty => return NO_RESULTS_HTML.to_string(),
            Render::Structured(verdicts) => verdicts
                .iter()
                .map(|v| {
                    format!(
                        "<div class=\"fact-claim\"><div class=\"claim-text\">\"{}\"</div>\
                         <div class=\"verdict {}\">{}</div>\
                         <div class=\"explanation\">{}</div></div>",
                        escape_html(&v.claim_text),
                        v.label.css_class(),
                        v.label,
                        escape_html(&v.explanation)
                    )
                })
                .collect::<String>(),
            Render::Paragraphs(paragraphs) => paragraphs
                .iter()
                .map(|p| format!("<p>{}</p>", highlight_keywords(&escape_html(p))))
                .collect::<String>(),
        };
        format!(
            "<div class=\"fact-check-result\">\
             <div class=\"fact-check-header\"><h3>Fact Check Results</h3></div>\
             <div class=\"fact-check-content\">{body}</div></div>"
        )
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        match self {
            Render::Empty => "No results were returned.".to_string(),
            Render::Structured(verdicts) => verdicts
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let mut line = format!("{}. \"{}\" => {}", i + 1, v.claim_text, v.label);
                    if !v.explanation.is_empty() {
                        line.push_str(&format!("\n   {}", v.explanation));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Render::Paragraphs(paragraphs) => paragraphs.join("\n\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_render_serializes_with_kind_tag() {
        let render = Render::Structured(vec![Verdict {
            claim_text: "Water is wet".into(),
            label: VerdictLabel::PartiallyTrue,
            explanation: "Depends on the definition.".into(),
        }]);
        assert_eq!(
            serde_json::to_value(&render).unwrap(),
            json!({
                "kind": "structured",
                "items": [{
                    "claimText": "Water is wet",
                    "label": "Partially True",
                    "explanation": "Depends on the definition."
                }]
            })
        );
        assert_eq!(
            render.to_text(),
            "1. \"Water is wet\" => Partially True\n   Depends on the definition."
        );
    }

    #[test]
    fn empty_render_text() {
        assert_eq!(serde_json::to_value(Render::Empty).unwrap(), json!({ "kind": "empty" }));
        assert_eq!(Render::Empty.to_text(), "No results were returned.");
    }
}
