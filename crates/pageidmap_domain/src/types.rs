//! Records flowing from a page source through the mapper.

use serde::{Deserialize, Serialize};

/// Opaque page identifier. Numeric in practice, but never used arithmetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page row as read from a source. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_id: PageId,
    pub space_key: String,
    pub title: String,
}

impl PageRecord {
    pub fn new(
        page_id: impl Into<PageId>,
        space_key: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            space_key: space_key.into(),
            title: title.into(),
        }
    }
}

/// How a title has to be redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingKind {
    /// The default slug URL works, no rule needed.
    NoMapping,
    /// Route through full-text search.
    Search,
    /// Address the page by space and encoded title.
    Display,
}

/// A page that needs a redirect, with its root-relative target path.
///
/// `target_path` always starts with `/wiki/` and never carries a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    pub page_id: PageId,
    pub space_key: String,
    pub target_path: String,
}
