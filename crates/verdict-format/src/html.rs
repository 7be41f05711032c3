use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const NO_RESULTS_HTML: &str = "<p>No results were returned.</p>";

static KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(partially true|partly true|somewhat true|partially|true|accurate|correct|inaccurate|incorrect|misleading|false)\b",
    )
    .expect("keyword pattern is valid")
});

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap verdict words in `<span class="...-statement">`. Single pass, so a
/// phrase like "partially true" is wrapped once.
pub fn highlight_keywords(escaped: &str) -> String {
    KEYWORDS
        .replace_all(escaped, |caps: &Captures<'_>| {
            let word = &caps[1];
            let lower = word.to_ascii_lowercase();
            let class = if lower.starts_with("partially")
                || lower.starts_with("partly")
                || lower.starts_with("somewhat")
            {
                "partial-statement"
            } else if matches!(lower.as_str(), "true" | "accurate" | "correct") {
                "true-statement"
            } else {
                "false-statement"
            };
            format!("<span class=\"{class}\">{word}</span>")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn highlights_each_class_once() {
        let out = highlight_keywords("This is Partially True, that is false, this is accurate.");
        assert_eq!(
            out,
            "This is <span class=\"partial-statement\">Partially True</span>, that is \
             <span class=\"false-statement\">false</span>, this is \
             <span class=\"true-statement\">accurate</span>."
        );
    }

    #[test]
    fn keywords_inside_words_are_left_alone() {
        assert_eq!(highlight_keywords("untrue falsehood"), "untrue falsehood");
    }
}
