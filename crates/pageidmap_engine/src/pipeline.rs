//! Lazy record pipeline. Order-preserving, one record in flight.

use crate::classify::classify;
use crate::url_builder::build_url;
use pageidmap_domain::{MappingResult, PageRecord};

/// Maps a single record, or `None` if its title needs no redirect.
pub fn map_record(record: PageRecord) -> Option<MappingResult> {
    let kind = classify(&record.title);
    let target_path = build_url(kind, &record.space_key, &record.title);
    tracing::trace!(page_id = %record.page_id, ?kind, "classified page");
    target_path.map(|target_path| MappingResult {
        page_id: record.page_id,
        space_key: record.space_key,
        target_path,
    })
}

/// Lazily maps a sequence of records.
///
/// Restartable exactly when the underlying source is: handing in a fresh
/// iterator over the same data yields the same results.
pub fn map_records<I>(records: I) -> MappedRecords<I::IntoIter>
where
    I: IntoIterator<Item = PageRecord>,
{
    MappedRecords {
        records: records.into_iter(),
    }
}

pub struct MappedRecords<I> {
    records: I,
}

impl<I> Iterator for MappedRecords<I>
where
    I: Iterator<Item = PageRecord>,
{
    type Item = MappingResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.by_ref().find_map(map_record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

impl<I> std::iter::FusedIterator for MappedRecords<I> where
    I: std::iter::FusedIterator<Item = PageRecord>
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn record(id: &str, space: &str, title: &str) -> PageRecord {
        PageRecord::new(id, space, title)
    }

    #[test]
    fn test_map_record_search() {
        let result = map_record(record("123", "INFO", "Page with & Special Chars")).unwrap();
        assert_eq!(result.page_id.as_str(), "123");
        assert_eq!(result.space_key, "INFO");
        assert_eq!(
            result.target_path,
            "/wiki/search?text=Page%20with%20%26%20Special%20Chars"
        );
    }

    #[test]
    fn test_map_record_no_mapping() {
        assert!(map_record(record("456", "DOCS", "Normal Page Title")).is_none());
    }

    #[test]
    fn test_map_records_filters_and_preserves_order() {
        let input = vec![
            record("1", "A", "First?"),
            record("2", "A", "Plain"),
            record("3", "B", "Second & Third"),
            record("4", "B", "Another Plain"),
            record("5", "C", "Ende."),
        ];
        let ids: Vec<String> = map_records(input)
            .map(|r| r.page_id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_map_records_keeps_duplicate_ids() {
        let input = vec![
            record("7", "INFO", "Same?"),
            record("7", "DOCS", "Same?"),
        ];
        let results: Vec<_> = map_records(input).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].target_path, "/wiki/display/INFO/Same%3F");
        assert_eq!(results[1].target_path, "/wiki/display/DOCS/Same%3F");
    }

    #[test]
    fn test_map_records_empty() {
        assert_eq!(map_records(Vec::new()).count(), 0);
    }

    #[test]
    fn test_map_records_pulls_lazily() {
        let pulled = Cell::new(0usize);
        let source = (0..1000).map(|i| {
            pulled.set(pulled.get() + 1);
            record(&i.to_string(), "LAZY", "Needs mapping?")
        });

        let mut mapped = map_records(source);
        assert_eq!(pulled.get(), 0);
        mapped.next();
        assert_eq!(pulled.get(), 1);
        mapped.next();
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_map_records_restartable_over_same_data() {
        let input = vec![record("1", "A", "Q?"), record("2", "A", "R&D")];
        let first: Vec<_> = map_records(input.iter().cloned()).collect();
        let second: Vec<_> = map_records(input.iter().cloned()).collect();
        assert_eq!(first, second);
    }
}
