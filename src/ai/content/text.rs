//! Character-based text helpers shared by the checker and the generator.
//!
//! All lengths are counted in `char`s so multi-byte punctuation such as
//! "—" counts once.

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First `max` characters of `text`, with trailing whitespace and
/// separators trimmed.
pub fn clip_chars(text: &str, max: usize) -> String {
    let clipped: String = text.chars().take(max).collect();
    clipped
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '|' | ':'))
        .to_string()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first character.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("a — b"), 5);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn test_clip_chars_trims_separators() {
        assert_eq!(clip_chars("Organic Face Cream", 8), "Organic");
        assert_eq!(clip_chars("Serum | Gold", 7), "Serum");
        assert_eq!(clip_chars("Crème", 10), "Crème");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Face   Cream \n"), "Face Cream");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("this product"), "This product");
        assert_eq!(capitalize_first(""), "");
    }
}
