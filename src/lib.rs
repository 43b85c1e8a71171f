//! Confluence page ID mapper: converts legacy page records into Cloud URLs
//! and redirect rules.

pub use pageidmap_domain as domain;
pub use pageidmap_engine as engine;
pub use pageidmap_source as source;
