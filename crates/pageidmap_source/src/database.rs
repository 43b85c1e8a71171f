//! Page query shared by the relational sources.

/// Current pages of the requested spaces. Historical versions have a
/// `PREVVER`, drafts and trashed pages a different `CONTENT_STATUS`.
const PAGE_QUERY: &str = "SELECT CONTENTID, SPACEKEY, TITLE \
     FROM CONTENT \
     JOIN SPACES S ON CONTENT.SPACEID = S.SPACEID \
     WHERE CONTENTTYPE = 'PAGE' \
     AND PREVVER IS NULL \
     AND CONTENT_STATUS = 'current' \
     AND S.SPACEKEY IN";

/// The page query with one positional `?` per space key. Both MySQL and
/// SQLite bind these in order.
pub(crate) fn page_query(key_count: usize) -> String {
    let placeholders = vec!["?"; key_count].join(", ");
    format!("{PAGE_QUERY} ({placeholders})")
}

/// Splits a comma-separated space list, trimming and upper-casing each key.
pub fn parse_space_keys(spaces: &str) -> Vec<String> {
    spaces
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_uppercase)
        .collect()
}
