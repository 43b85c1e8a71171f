//! Title classification. First match wins: search characters, then display
//! characters, non-printable-ASCII or a non-alphanumeric last character.

use pageidmap_domain::MappingKind;

const SEARCH_CHARS: &[char] = &['&', '/', '+', '%'];
const DISPLAY_CHARS: &[char] = &['?', '\\', ';', '#', '§', ':'];

pub fn classify(title: &str) -> MappingKind {
    if title.contains(SEARCH_CHARS) {
        MappingKind::Search
    } else if title.contains(DISPLAY_CHARS)
        || title.chars().any(|c| !is_printable_ascii(c))
        || !ends_alphanumeric(title)
    {
        MappingKind::Display
    } else {
        MappingKind::NoMapping
    }
}

fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~')
}

// Empty titles have no last character and count as not alphanumeric-ending.
fn ends_alphanumeric(title: &str) -> bool {
    title.chars().next_back().is_some_and(char::is_alphanumeric)
}
