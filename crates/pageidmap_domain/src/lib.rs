pub mod render_config;
pub mod types;

pub use render_config::{ConfigError, OutputFormat, RenderConfig};
pub use types::{MappingKind, MappingResult, PageId, PageRecord};
