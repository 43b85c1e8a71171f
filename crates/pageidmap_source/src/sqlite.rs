use crate::database::page_query;
use crate::error::SourceError;
use crate::source::{PageSource, drive};
use pageidmap_domain::PageRecord;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use std::path::PathBuf;

/// SQLite snapshot of a Confluence database, opened read-only.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
    space_keys: Vec<String>,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>, space_keys: Vec<String>) -> Self {
        Self {
            path: path.into(),
            space_keys,
        }
    }

    fn open(&self) -> Result<Connection, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

impl PageSource for SqliteSource {
    fn scan<T, F>(&mut self, consume: F) -> Result<T, SourceError>
    where
        F: FnOnce(&mut dyn Iterator<Item = PageRecord>) -> T,
    {
        if self.space_keys.is_empty() {
            return Err(SourceError::NoSpaceKeys);
        }
        let conn = self.open()?;
        tracing::info!(
            path = %self.path.display(),
            spaces = %self.space_keys.join(", "),
            "Querying spaces"
        );

        let mut stmt = conn.prepare(&page_query(self.space_keys.len()))?;
        let rows = stmt.query_map(params_from_iter(self.space_keys.iter()), row_to_record)?;
        drive(rows.map(|row| row.map_err(SourceError::from)), consume)
    }
}

// CONTENTID is numeric in Confluence schemas but may come through as text
// from exported snapshots.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
    let page_id = match row.get_ref(0)? {
        ValueRef::Integer(id) => id.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                0,
                "CONTENTID".to_string(),
                other.data_type(),
            ));
        }
    };
    Ok(PageRecord::new(page_id, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
}
