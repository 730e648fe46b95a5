use regex::Regex;
use std::sync::LazyLock;

static HTML_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

pub const MAX_MESSAGE_LEN: usize = 500;

/// Strips HTML tags and quote/angle characters from a card message, trims
/// whitespace and caps the length at [`MAX_MESSAGE_LEN`] characters.
pub fn sanitize_message(message: &str) -> String {
    let without_tags = HTML_TAGS.replace_all(message, "");

    let cleaned: String = without_tags
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect();

    cleaned.trim().chars().take(MAX_MESSAGE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        assert_eq!(
            sanitize_message("<script>alert('xss')</script>hello"),
            "alert(xss)hello"
        );
    }

    #[test]
    fn strips_quotes_and_angles() {
        assert_eq!(sanitize_message(r#"a "b" 'c' <d"#), "a b c d");
    }

    #[test]
    fn trims_and_truncates() {
        assert_eq!(sanitize_message("  hi  "), "hi");

        let long = "x".repeat(MAX_MESSAGE_LEN + 50);
        assert_eq!(sanitize_message(&long).chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn truncates_on_character_boundaries() {
        let message = "é".repeat(MAX_MESSAGE_LEN + 1);
        let sanitized = sanitize_message(&message);
        assert_eq!(sanitized.chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn plain_messages_pass_through() {
        assert_eq!(sanitize_message("see you at 5pm!"), "see you at 5pm!");
    }
}
