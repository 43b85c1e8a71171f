use pageidmap_domain::MappingKind;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except ASCII alphanumerics and `-_.~` is escaped. Non-ASCII
/// characters are escaped as their UTF-8 bytes.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the root-relative target path for an already classified title.
///
/// Returns `None` for [`MappingKind::NoMapping`]; those pages keep their
/// default URL and get no rule.
pub fn build_url(kind: MappingKind, space_key: &str, title: &str) -> Option<String> {
    match kind {
        MappingKind::NoMapping => None,
        MappingKind::Search => Some(search_path(title)),
        MappingKind::Display => Some(display_path(space_key, title)),
    }
}

/// `/wiki/search?text=<title>` with spaces as `%20`.
pub fn search_path(title: &str) -> String {
    format!("/wiki/search?text={}", encode_query(title))
}

/// `/wiki/display/<space_key>/<title>` with spaces as `+`.
///
/// The space key is inserted as-is.
pub fn display_path(space_key: &str, title: &str) -> String {
    format!("/wiki/display/{}/{}", space_key, encode_path_segment(title))
}

pub fn encode_query(text: &str) -> String {
    utf8_percent_encode(text, UNRESERVED).to_string()
}

pub fn encode_path_segment(text: &str) -> String {
    text.split(' ')
        .map(|part| utf8_percent_encode(part, UNRESERVED).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_spaces_and_ampersand() {
        assert_eq!(
            search_path("Page with & Special Chars"),
            "/wiki/search?text=Page%20with%20%26%20Special%20Chars"
        );
    }

    #[test]
    fn test_search_path_reserved_chars() {
        assert_eq!(search_path("a=b"), "/wiki/search?text=a%3Db");
        assert_eq!(search_path("C#/C++"), "/wiki/search?text=C%23%2FC%2B%2B");
        assert_eq!(search_path("50% off?"), "/wiki/search?text=50%25%20off%3F");
    }

    #[test]
    fn test_search_path_non_ascii() {
        assert_eq!(search_path("Ü & Ö"), "/wiki/search?text=%C3%9C%20%26%20%C3%96");
    }

    #[test]
    fn test_display_path_question_mark() {
        assert_eq!(display_path("HELP", "Title?"), "/wiki/display/HELP/Title%3F");
    }

    #[test]
    fn test_display_path_spaces_become_plus() {
        assert_eq!(
            display_path("DOCS", "What is this?"),
            "/wiki/display/DOCS/What+is+this%3F"
        );
    }

    #[test]
    fn test_display_path_umlaut() {
        assert_eq!(display_path("INFO", "Ümlauts"), "/wiki/display/INFO/%C3%9Cmlauts");
    }

    #[test]
    fn test_display_path_unreserved_pass_through() {
        assert_eq!(display_path("X", "a-b_c.d~e."), "/wiki/display/X/a-b_c.d~e.");
    }

    #[test]
    fn test_display_path_escapes_slash() {
        assert_eq!(display_path("X", "a/b"), "/wiki/display/X/a%2Fb");
    }

    #[test]
    fn test_display_path_empty_title() {
        assert_eq!(display_path("INFO", ""), "/wiki/display/INFO/");
    }

    #[test]
    fn test_display_path_space_key_verbatim() {
        assert_eq!(display_path("~jdoe", "Notes:"), "/wiki/display/~jdoe/Notes%3A");
    }

    #[test]
    fn test_build_url_dispatch() {
        assert_eq!(build_url(MappingKind::NoMapping, "INFO", "Plain"), None);
        assert_eq!(
            build_url(MappingKind::Search, "INFO", "A+B").as_deref(),
            Some("/wiki/search?text=A%2BB")
        );
        assert_eq!(
            build_url(MappingKind::Display, "INFO", "A:B").as_deref(),
            Some("/wiki/display/INFO/A%3AB")
        );
    }

    #[test]
    fn test_encoded_output_has_no_tabs_or_newlines() {
        let encoded = encode_path_segment("a\tb\nc");
        assert!(!encoded.contains('\t'));
        assert!(!encoded.contains('\n'));
        assert_eq!(encode_query("a\tb"), "a%09b");
    }
}
