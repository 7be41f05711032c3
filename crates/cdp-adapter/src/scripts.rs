//! Page scripts evaluated by [`crate::ChromiumDom`]. Every argument is
//! embedded as a JSON literal.

fn lit(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn with_element(selector: &str, body: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) return false; {body} }})()",
        lit(selector)
    )
}

pub(crate) fn current_url() -> String {
    "location.href".to_string()
}

pub(crate) fn exists(selector: &str) -> String {
    format!("!!document.querySelector({})", lit(selector))
}

pub(crate) fn count(selector: &str) -> String {
    format!("document.querySelectorAll({}).length", lit(selector))
}

pub(crate) fn focus(selector: &str) -> String {
    with_element(selector, "el.focus(); return true;")
}

pub(crate) fn insert_text(selector: &str, text: &str) -> String {
    with_element(
        selector,
        &format!(
            "el.focus(); return document.execCommand('insertText', false, {});",
            lit(text)
        ),
    )
}

pub(crate) fn set_value(selector: &str, text: &str) -> String {
    with_element(
        selector,
        &format!(
            "if (!('value' in el)) return false; el.value = {}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); return true;",
            lit(text)
        ),
    )
}

pub(crate) fn set_text_content(selector: &str, text: &str) -> String {
    with_element(
        selector,
        &format!(
            "el.textContent = {}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             return true;",
            lit(text)
        ),
    )
}

pub(crate) fn click(selector: &str) -> String {
    with_element(selector, "el.click(); return true;")
}

pub(crate) fn last_group_text(group: &str, item: &str) -> String {
    format!(
        "(() => {{ const groups = document.querySelectorAll({}); \
         if (!groups.length) return null; \
         const last = groups[groups.length - 1]; \
         const items = last.querySelectorAll({}); \
         const parts = items.length ? Array.from(items, n => n.innerText) : [last.innerText]; \
         return parts.join('\\n'); }})()",
        lit(group),
        lit(item)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_json_quoted() {
        assert_eq!(
            exists(r#"[data-testid="tweetTextarea"]"#),
            r#"!!document.querySelector("[data-testid=\"tweetTextarea\"]")"#
        );
    }

    #[test]
    fn text_cannot_break_out_of_the_literal() {
        let script = insert_text("textarea", "'); alert(1); ('\n\"");
        assert!(script.contains(r#"'insertText', false, "'); alert(1); ('\n\"");"#));
    }

    #[test]
    fn group_script_joins_items_with_newlines() {
        let script = last_group_text(".group", "p");
        assert!(script.contains(r#"document.querySelectorAll(".group")"#));
        assert!(script.contains(r#"last.querySelectorAll("p")"#));
        assert!(script.contains("parts.join('\\n')"));
    }
}
