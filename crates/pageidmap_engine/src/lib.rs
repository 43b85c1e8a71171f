pub mod classify;
pub mod pipeline;
pub mod render;
pub mod url_builder;

pub use classify::classify;
pub use pipeline::{MappedRecords, map_record, map_records};
pub use render::{Rendered, render, write_rendered};
pub use url_builder::build_url;
