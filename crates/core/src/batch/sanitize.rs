//! Filename sanitization for untrusted upload names.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Reduces an untrusted filename to a safe single path component.
///
/// Follows the common "secure filename" rules: the name is NFKD-folded so
/// accented letters keep their base letter, remaining non-ASCII characters
/// are dropped, both `/` and `\` become spaces, whitespace runs are joined with
/// `_`, anything outside `[A-Za-z0-9_.-]` is removed, and leading or
/// trailing `.`/`_` are stripped. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = DISALLOWED.replace_all(&joined, "");

    stripped.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(secure_filename("deck.pptx"), "deck.pptx");
        assert_eq!(secure_filename("Q3-review_v2.PPT"), "Q3-review_v2.PPT");
    }

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(secure_filename("My  Deck final.pptx"), "My_Deck_final.pptx");
    }

    #[test]
    fn test_path_traversal_removed() {
        assert_eq!(secure_filename("../../evil.pptx"), "evil.pptx");
        assert_eq!(secure_filename("/etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\..\\windows\\deck.ppt"), "windows_deck.ppt");
    }

    #[test]
    fn test_special_characters_removed() {
        assert_eq!(secure_filename("deck (final)!.pptx"), "deck_final.pptx");
        assert_eq!(secure_filename("a;b|c.pptx"), "abc.pptx");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(secure_filename("演示.pptx"), "pptx");
        assert_eq!(secure_filename("✓deck.pptx"), "deck.pptx");
    }

    #[test]
    fn test_accents_fold_to_base_letter() {
        assert_eq!(secure_filename("café.pptx"), "cafe.pptx");
        assert_eq!(secure_filename("Präsentation.pptx"), "Prasentation.pptx");
        assert_eq!(secure_filename("Ｑ３ deck.pptx"), "Q3_deck.pptx");
    }

    #[test]
    fn test_degenerate_names_become_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename(".."), "");
        assert_eq!(secure_filename("../"), "");
        assert_eq!(secure_filename("___"), "");
    }

    #[test]
    fn test_hidden_file_dot_stripped() {
        assert_eq!(secure_filename(".hidden.pptx"), "hidden.pptx");
    }
}
