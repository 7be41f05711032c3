//! Rendered-text approximation of an element (what a reader would see).

use scraper::{ElementRef, Node};

/// Elements that never render text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "svg", "canvas", "iframe",
    "object",
];

/// Elements that start and end on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hr", "li", "main", "nav",
    "ol", "section", "summary", "table", "tbody", "thead", "tfoot", "tr", "ul", "pre",
];

/// Elements separated from their neighbours by a blank line.
const PARAGRAPH_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Visible text of `element`, laid out line by line.
///
/// Block elements break lines, paragraphs and headings are separated by a blank
/// line, inline whitespace collapses to single spaces, and hidden subtrees
/// (`hidden`, `aria-hidden="true"`) are skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect(element, &mut raw);
    tidy_lines(&raw)
}

/// Every text node of the element, hidden ones included, except those inside
/// elements that never render text.
pub fn raw_text(element: ElementRef<'_>) -> String {
    let mut joined = String::new();
    collect_raw(element, &mut joined);
    tidy_lines(&joined)
}

fn collect_raw(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
            Node::Element(el) if !SKIPPED_TAGS.contains(&el.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_raw(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_inline(out, text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) || is_hidden(el) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let breaks = if PARAGRAPH_TAGS.contains(&name) {
                    2
                } else if BLOCK_TAGS.contains(&name) || name == "td" || name == "th" {
                    1
                } else {
                    0
                };
                ensure_breaks(out, breaks);
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect(child_el, out);
                }
                ensure_breaks(out, breaks);
            }
            _ => {}
        }
    }
}

fn is_hidden(el: &scraper::node::Element) -> bool {
    el.attr("hidden").is_some()
        || el
            .attr("aria-hidden")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
}

fn push_inline(out: &mut String, text: &str) {
    let mut pending_space = text.starts_with(char::is_whitespace);
    for word in text.split_whitespace() {
        if pending_space && !out.is_empty() && !out.ends_with(['\n', ' ']) {
            out.push(' ');
        }
        out.push_str(word);
        pending_space = true;
    }
    if text.ends_with(char::is_whitespace) && !text.trim().is_empty() {
        out.push(' ');
    }
}

fn ensure_breaks(out: &mut String, breaks: usize) {
    if breaks == 0 || out.is_empty() {
        return;
    }
    let trimmed_len = out.trim_end_matches(' ').len();
    out.truncate(trimmed_len);
    let existing = out.chars().rev().take_while(|c| *c == '\n').count();
    for _ in existing..breaks {
        out.push('\n');
    }
}

/// Trim every line and keep at most one blank line between text lines.
pub fn tidy_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn body_text(html: &str) -> String {
        let doc = Html::parse_document(html);
        let body = Selector::parse("body").unwrap();
        visible_text(doc.select(&body).next().unwrap())
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let text = body_text("<body><p>First   para.</p><p>Second\n para.</p></body>");
        assert_eq!(text, "First para.\n\nSecond para.");
    }

    #[test]
    fn inline_elements_stay_on_one_line() {
        let text = body_text("<body><p>Read <a href='#'>the report</a> <b>today</b>.</p></body>");
        assert_eq!(text, "Read the report today.");
    }

    #[test]
    fn scripts_and_hidden_nodes_are_skipped() {
        let text = body_text(
            "<body><script>var x = 1;</script><div hidden>secret</div>\
             <span aria-hidden='true'>icon</span><div>shown</div></body>",
        );
        assert_eq!(text, "shown");
    }

    #[test]
    fn raw_text_keeps_hidden_but_not_script_source() {
        let doc = Html::parse_document(
            "<body><style>p { color: red }</style><div hidden>secret</div>\
             <script>track('view');</script><p>shown</p></body>",
        );
        let body = Selector::parse("body").unwrap();
        assert_eq!(raw_text(doc.select(&body).next().unwrap()), "secret shown");
    }

    #[test]
    fn line_breaks_and_list_items() {
        let text = body_text("<body><ul><li>one</li><li>two</li></ul>a<br>b</body>");
        assert_eq!(text, "one\ntwo\na\nb");
    }
}
