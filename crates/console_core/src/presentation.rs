//! Text shaping for pattern list rows.

const PREVIEW_LIMIT: usize = 100;
const PREVIEW_TRUNCATED_LEN: usize = 80;

/// Upper-cases the first character and lower-cases the rest.
pub fn display_name(file_name: &str) -> String {
    let mut chars = file_name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// One-line preview of a pattern's text for the list view.
///
/// Markdown headings, newlines and dashes become spaces and the boilerplate
/// `IDENTITY and PURPOSE` heading is dropped. Previews longer than 100
/// characters are cut to 80 followed by `...`.
pub fn preview_text(pattern_text: &str) -> String {
    let flattened = pattern_text
        .replace('#', " ")
        .replace('\n', " ")
        .replace("IDENTITY and PURPOSE", "")
        .replace('-', " ");
    if flattened.chars().count() > PREVIEW_LIMIT {
        let head: String = flattened.chars().take(PREVIEW_TRUNCATED_LEN).collect();
        format!("{head}...")
    } else {
        flattened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_file_names() {
        assert_eq!(display_name("extract_wisdom"), "Extract_wisdom");
        assert_eq!(display_name("SOCRATIC"), "Socratic");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn strips_markdown_noise_from_previews() {
        assert_eq!(
            preview_text("# IDENTITY and PURPOSE\nBe terse - always"),
            "   Be terse   always"
        );
    }

    #[test]
    fn truncates_only_past_one_hundred_characters() {
        let exactly_hundred = "a".repeat(100);
        assert_eq!(preview_text(&exactly_hundred), exactly_hundred);

        let long = "b".repeat(101);
        let preview = preview_text(&long);
        assert_eq!(preview, format!("{}...", "b".repeat(80)));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let long = "é".repeat(120);
        assert_eq!(preview_text(&long).chars().count(), 83);
    }
}
