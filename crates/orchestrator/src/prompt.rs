/// Marker appended when the content was cut.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Wrap page content in the fact-check instruction template, cutting the
/// content after `cap` characters.
pub fn format_prompt(text: &str, cap: usize) -> String {
    let content = if text.chars().count() > cap {
        let cut: String = text.chars().take(cap).collect();
        format!("{cut}{TRUNCATION_MARKER}")
    } else {
        text.to_string()
    };

    format!(
        "Please fact check the following content and tell me which statements are accurate \
         and which ones are not. Provide evidence for your answers.\n\n\
         Content to fact check:\n\"\"\"\n{content}\n\"\"\"\n\n\
         Please provide your fact check in a structured way, listing each major claim and \
         your assessment."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_embedded_verbatim() {
        let prompt = format_prompt("The moon is made of rock.", 5000);
        assert!(prompt.contains("\"\"\"\nThe moon is made of rock.\n\"\"\""));
        assert!(!prompt.contains(TRUNCATION_MARKER));
        assert!(prompt.starts_with("Please fact check the following content"));
    }

    #[test]
    fn long_content_is_cut_at_cap() {
        let text = "é".repeat(5001);
        let prompt = format_prompt(&text, 5000);
        let expected = format!("{}{}", "é".repeat(5000), TRUNCATION_MARKER);
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"é".repeat(5001)));
    }

    #[test]
    fn content_at_cap_is_untouched() {
        let text = "a".repeat(5000);
        assert!(!format_prompt(&text, 5000).contains(TRUNCATION_MARKER));
    }
}
