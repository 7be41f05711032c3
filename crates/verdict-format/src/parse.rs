use once_cell::sync::Lazy;
use regex::Regex;

use crate::verdict::{Render, Verdict, VerdictLabel};

/// Characters scanned after the verdict keyword to decide the label.
const VERDICT_WINDOW_CHARS: usize = 100;

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("blank line pattern is valid"));

static SPEAKER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*grok:\s*").expect("speaker pattern is valid"));

static CLAIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:Claim|Statement|Fact)\s*(?:\d+)?:\s*["']?(.+?)["']?\s*(True|False|Accurate|Inaccurate|Misleading|Partially)"#,
    )
    .expect("claim pattern is valid")
});

static CLAIM_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Claim|Statement|Fact)\s*\d*:").expect("marker pattern is valid")
});

static VERDICT_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)partially|partly|somewhat|inaccurate|incorrect|misleading|false|true|accurate|correct",
    )
    .expect("verdict pattern is valid")
});

/// A qualifier such as "partially" usually precedes the word it qualifies.
static QUALIFIED_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s+(?:true|accurate|correct)").expect("qualifier pattern is valid")
});

/// Trim, squeeze blank-line runs, and drop a leading `Grok:` speaker tag.
pub fn clean_response(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let squeezed = EXCESS_NEWLINES.replace_all(unified.trim(), "\n\n");
    SPEAKER_PREFIX.replace(&squeezed, "").trim().to_string()
}

pub fn format_result(raw: &str) -> Render {
    let text = clean_response(raw);
    if text.is_empty() {
        return Render::Empty;
    }

    let verdicts = extract_verdicts(&text);
    if !verdicts.is_empty() {
        return Render::Structured(verdicts);
    }

    let paragraphs: Vec<String> = BLANK_LINE
        .split(&text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    Render::Paragraphs(paragraphs)
}

pub fn render_html(raw: &str) -> String {
    format_result(raw).to_html()
}

fn extract_verdicts(text: &str) -> Vec<Verdict> {
    CLAIM
        .captures_iter(text)
        .filter_map(|caps| {
            let claim = caps.get(1)?;
            let keyword = caps.get(2)?;
            let (label, verdict_end) = classify(text, keyword.start());

            let rest = &text[verdict_end..];
            let explanation_end = CLAIM_MARKER
                .find(rest)
                .map(|m| m.start())
                .unwrap_or(rest.len());
            let explanation = rest[..explanation_end]
                .trim()
                .trim_start_matches(['.', ':', ',', ';'])
                .trim()
                .to_string();

            Some(Verdict {
                claim_text: claim.as_str().trim().to_string(),
                label,
                explanation,
            })
        })
        .collect()
}

/// Label from the earliest verdict word in the window starting at `start`,
/// plus the byte offset where that verdict phrase ends.
fn classify(text: &str, start: usize) -> (VerdictLabel, usize) {
    let window_end = text[start..]
        .char_indices()
        .nth(VERDICT_WINDOW_CHARS)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());
    let window = &text[start..window_end];

    let Some(word) = VERDICT_WORD.find(window) else {
        return (VerdictLabel::Unknown, start);
    };
    let mut end = start + word.end();
    let label = match word.as_str().to_ascii_lowercase().as_str() {
        "true" | "accurate" | "correct" => VerdictLabel::True,
        "partially" | "partly" | "somewhat" => {
            if let Some(tail) = QUALIFIED_TAIL.find(&text[end..]) {
                end += tail.end();
            }
            VerdictLabel::PartiallyTrue
        }
        _ => VerdictLabel::False,
    };
    (label, end)
}
