use crate::error::SourceError;
use pageidmap_domain::PageRecord;

/// Anything that can produce a sequence of page records.
///
/// `scan` acquires the underlying resource, hands `consume` a lazy iterator
/// of well-formed records and releases the resource once `consume` returns,
/// whether or not the iterator was exhausted. A read failure ends the
/// iteration early and is reported after `consume` returns; whatever
/// `consume` already did with earlier records stands.
pub trait PageSource {
    fn scan<T, F>(&mut self, consume: F) -> Result<T, SourceError>
    where
        F: FnOnce(&mut dyn Iterator<Item = PageRecord>) -> T;
}

/// Feeds the `Ok` records to `consume`, stopping at the first error.
pub(crate) fn drive<I, T, F>(records: I, consume: F) -> Result<T, SourceError>
where
    I: Iterator<Item = Result<PageRecord, SourceError>>,
    F: FnOnce(&mut dyn Iterator<Item = PageRecord>) -> T,
{
    let mut failure = None;
    let output = {
        let mut records = records
            .map_while(|record| match record {
                Ok(record) => Some(record),
                Err(e) => {
                    failure = Some(e);
                    None
                }
            })
            .fuse();
        consume(&mut records)
    };
    match failure {
        Some(e) => Err(e),
        None => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_passes_all_records() {
        let input = vec![
            Ok(PageRecord::new("1", "A", "One")),
            Ok(PageRecord::new("2", "A", "Two")),
        ];
        let titles = drive(input.into_iter(), |records| {
            records.map(|r| r.title).collect::<Vec<_>>()
        })
        .unwrap();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_drive_stops_at_first_error() {
        let input = vec![
            Ok(PageRecord::new("1", "A", "One")),
            Err(SourceError::NoSpaceKeys),
            Ok(PageRecord::new("3", "A", "Three")),
        ];
        let mut seen = Vec::new();
        let result = drive(input.into_iter(), |records| {
            seen.extend(records.map(|r| r.page_id.to_string()));
        });
        assert!(matches!(result, Err(SourceError::NoSpaceKeys)));
        assert_eq!(seen, vec!["1"]);
    }

    #[test]
    fn test_drive_consumer_may_stop_early() {
        let input = (0..).map(|i| Ok(PageRecord::new(i.to_string(), "A", "T")));
        let first = drive(input, |records| records.next()).unwrap();
        assert_eq!(first.unwrap().page_id.as_str(), "0");
    }
}
