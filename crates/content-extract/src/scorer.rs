//! Relevance score of a candidate text block

/// Candidates shorter than this (in characters) are boilerplate.
pub const MIN_CANDIDATE_CHARS: usize = 100;

/// A line counts as a paragraph only above this length.
pub const MIN_SEGMENT_CHARS: usize = 40;

pub const WORD_WEIGHT: f64 = 0.5;
pub const PARAGRAPH_WEIGHT: f64 = 10.0;

/// Score a block of visible text.
///
/// `words * 0.5 + paragraphs * 10`, so structured multi-paragraph text beats a
/// single dense blob with the same word count. Text under
/// [`MIN_CANDIDATE_CHARS`] scores zero.
pub fn score(text: &str) -> f64 {
    if text.chars().count() < MIN_CANDIDATE_CHARS {
        return 0.0;
    }
    let words = text.split_whitespace().count();
    word_count_score(words) + paragraph_count(text) as f64 * PARAGRAPH_WEIGHT
}

/// Lines whose trimmed length exceeds [`MIN_SEGMENT_CHARS`].
pub fn paragraph_count(text: &str) -> usize {
    text.split('\n')
        .filter(|line| line.trim().chars().count() > MIN_SEGMENT_CHARS)
        .count()
}

fn word_count_score(words: usize) -> f64 {
    words as f64 * WORD_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_scores_zero() {
        assert_eq!(score("too short to matter"), 0.0);
        assert_eq!(score(&"x".repeat(MIN_CANDIDATE_CHARS - 1)), 0.0);
    }

    #[test]
    fn score_counts_words_and_paragraphs() {
        let line = "one two three four five six seven eight nine ten eleven";
        let text = format!("{line}\n{line}");
        // 22 words, 2 paragraphs above the segment floor
        assert_eq!(score(&text), 22.0 * 0.5 + 2.0 * 10.0);
    }

    #[test]
    fn paragraphs_outrank_a_dense_blob() {
        let sentence = "The committee published its findings after a long review";
        let structured = [sentence; 4].join("\n");
        let blob = [sentence; 4].join(" ");
        assert_eq!(
            structured.split_whitespace().count(),
            blob.split_whitespace().count()
        );
        assert!(score(&structured) > score(&blob));
    }

    #[test]
    fn short_lines_are_not_paragraphs() {
        assert_eq!(paragraph_count("short\nalso short\n\n"), 0);
    }
}
