use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database error: {0}")]
    Mysql(#[from] mysql::Error),
    #[error("Invalid database string {0}")]
    InvalidAddress(String),
    #[error("Unexpected row: {0}")]
    InvalidRow(String),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No space keys given")]
    NoSpaceKeys,
}

impl From<toml::de::Error> for SourceError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
