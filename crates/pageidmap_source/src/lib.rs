pub mod config_store;
pub mod database;
pub mod delimited;
pub mod error;
pub mod mysql_source;
pub mod source;
pub mod sqlite;

pub use config_store::{AppConfig, DatabaseSettings, ProcessingSettings, SnapshotSettings, TomlConfigStore};
pub use database::parse_space_keys;
pub use delimited::{DelimitedReader, DelimitedSource};
pub use error::SourceError;
pub use mysql_source::{MysqlAddress, MysqlOptions, MysqlSource};
pub use source::PageSource;
pub use sqlite::SqliteSource;
