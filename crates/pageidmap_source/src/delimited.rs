//! Tab-separated page export: `page_id<TAB>space_key<TAB>title`, one per line.
//!
//! Blank lines are skipped silently. Lines with fewer than three fields are
//! reported and skipped; columns past the third are ignored.

use crate::error::SourceError;
use crate::source::{PageSource, drive};
use pageidmap_domain::PageRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Delimited file on disk. Each `scan` re-opens the file, so scanning is
/// repeatable.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
}

impl DelimitedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for DelimitedSource {
    fn scan<T, F>(&mut self, consume: F) -> Result<T, SourceError>
    where
        F: FnOnce(&mut dyn Iterator<Item = PageRecord>) -> T,
    {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(self.path.clone()),
            _ => SourceError::Io(e),
        })?;
        tracing::info!(path = %self.path.display(), "Processing file");
        let mut reader = DelimitedReader::new(BufReader::new(file));
        let output = drive(reader.by_ref(), consume);
        if reader.skipped() > 0 {
            tracing::warn!(path = %self.path.display(), skipped = reader.skipped(), "Skipped invalid lines");
        }
        output
    }
}

/// Streams records out of any buffered reader.
pub struct DelimitedReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    skipped: usize,
}

impl<R: BufRead> DelimitedReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Malformed lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for DelimitedReader<R> {
    type Item = Result<PageRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(SourceError::Io(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Some(record) => return Some(Ok(record)),
                None => {
                    self.skipped += 1;
                    tracing::warn!(line = self.line_no, content = %line.trim(), "Invalid line");
                }
            }
        }
    }
}

pub fn parse_line(line: &str) -> Option<PageRecord> {
    let mut fields = line.trim().split('\t').map(str::trim);
    let page_id = fields.next()?;
    let space_key = fields.next()?;
    let title = fields.next()?;
    Some(PageRecord::new(page_id, space_key, title))
}
