use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use thiserror::Error;

use super::model::{
    Dataset, Record, Schema, JOURNAL_COLUMN, PUBLISH_TIME_COLUMN, TITLE_COLUMN,
};

/// Default location of the metadata table, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "metadata.csv";

/// Cell values treated as missing, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean the metadata table at `path`.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    let dataset = load_from_reader(file)?;
    if dataset.is_empty() {
        log::warn!("{} contains no papers with a title", path.display());
    }
    log::info!(
        "Loaded {} papers from {} ({} columns)",
        dataset.len(),
        path.display(),
        dataset.schema.column_count()
    );
    Ok(dataset)
}

/// Parse and clean CSV metadata from any reader.
///
/// Cleaning rules:
/// * rows whose `title` is missing are dropped
/// * `publish_time` is parsed permissively; failures leave the date absent
/// * `publication_year` is derived from successfully parsed dates only
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let schema = Schema::from_headers(headers.iter().cloned());
    log::debug!("Detected capabilities: {:?}", schema.capabilities);

    let title_idx = headers
        .iter()
        .position(|h| h == TITLE_COLUMN)
        .ok_or(LoadError::MissingColumn(TITLE_COLUMN))?;
    let journal_idx = headers.iter().position(|h| h == JOURNAL_COLUMN);
    let time_idx = headers.iter().position(|h| h == PUBLISH_TIME_COLUMN);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut bad_dates = 0usize;

    for result in reader.records() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(LoadError::RaggedRow {
                line: row.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: row.len(),
            });
        }

        let cell = |idx: usize| row.get(idx).filter(|v| !is_missing(v));

        let Some(title) = cell(title_idx) else {
            dropped += 1;
            continue;
        };
        let journal = journal_idx.and_then(cell).map(str::to_string);
        let raw_time = time_idx.and_then(cell);
        let publish_time = raw_time.and_then(parse_publish_time);
        if raw_time.is_some() && publish_time.is_none() {
            bad_dates += 1;
        }

        records.push(Record::new(title.to_string(), journal, publish_time));
    }

    if dropped > 0 {
        log::info!("Dropped {dropped} rows without a title");
    }
    if bad_dates > 0 {
        log::debug!("{bad_dates} publish_time values could not be parsed");
    }

    Ok(Dataset::new(records, schema))
}

/// Result of the process-wide load, shared by every caller.
pub type SharedDataset = Result<Arc<Dataset>, Arc<LoadError>>;

static SHARED: OnceCell<SharedDataset> = OnceCell::new();

/// Load the dataset once per process.
///
/// The first call reads `path`; later calls return the same handle (or the
/// same error) and ignore their argument.
pub fn shared(path: &Path) -> SharedDataset {
    SHARED
        .get_or_init(|| match load_file(path) {
            Ok(ds) => Ok(Arc::new(ds)),
            Err(e) => {
                log::warn!("Could not load {}: {e}", path.display());
                Err(Arc::new(e))
            }
        })
        .clone()
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

fn is_missing(value: &str) -> bool {
    value.is_empty() || NA_VALUES.contains(&value)
}

/// Parse a publication date, accepting the formats found in paper metadata.
/// Returns `None` for anything unrecognised.
pub fn parse_publish_time(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y %b %d", "%Y %B %d", "%b %d, %Y", "%B %d, %Y",
        "%d %b %Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // Offset-aware date-times keep the calendar date written in the value.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    const OFFSET_DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
    ];
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // Partial dates: "2020", "2020-05", "2020 May".
    let mut parts = s.splitn(2, ['-', ' ', '/']);
    let year = parse_year(parts.next()?)?;
    let month = match parts.next() {
        None => 1,
        Some(rest) => parse_month(rest.trim())?,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// A month number, three-letter abbreviation or full English name.
fn parse_month(s: &str) -> Option<u32> {
    if let Ok(m) = s.parse::<u32>() {
        return (1..=12).contains(&m).then_some(m);
    }
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    MONTHS
        .iter()
        .position(|m| s.eq_ignore_ascii_case(m) || s.eq_ignore_ascii_case(&m[..3]))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Capabilities, YEAR_COLUMN};

    fn load(text: &str) -> Dataset {
        load_from_reader(text.as_bytes()).expect("valid csv")
    }

    #[test]
    fn test_rows_without_title_are_dropped() {
        let ds = load(
            "title,journal,publish_time\n\
             Covid and Lungs,Lancet,2020-03-01\n\
             ,BMJ,2020-04-01\n\
             NaN,BMJ,2020-04-01\n\
             The Vaccine Study,,2021\n",
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].title, "Covid and Lungs");
        assert_eq!(ds.records[1].journal, None);
        assert_eq!(ds.records[1].publication_year, Some(2021));
    }

    #[test]
    fn test_unparseable_date_becomes_absent() {
        let ds = load("title,publish_time\nA,not a date\nB,\nC,2019-12-31\n");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].publish_time, None);
        assert_eq!(ds.records[0].publication_year, None);
        assert_eq!(ds.records[1].publication_year, None);
        assert_eq!(ds.records[2].publication_year, Some(2019));
    }

    #[test]
    fn test_schema_capabilities() {
        let ds = load("cord_uid,title,journal,publish_time,abstract\nx,A,J,2020,abs\n");
        assert_eq!(
            ds.capabilities(),
            Capabilities {
                journal: true,
                publication_year: true
            }
        );
        assert_eq!(ds.schema.column_count(), 6);
        assert!(ds.schema.columns.iter().any(|c| c == YEAR_COLUMN));

        let ds = load("title\nA\n");
        assert_eq!(ds.capabilities(), Capabilities::default());
        assert_eq!(ds.schema.column_count(), 1);
    }

    #[test]
    fn test_missing_title_column_is_an_error() {
        let err = load_from_reader("journal,publish_time\nJ,2020\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("title")));
    }

    #[test]
    fn test_short_rows_are_padded_long_rows_rejected() {
        let ds = load("title,journal,publish_time\nA\n");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].journal, None);

        let err = load_from_reader("title,journal\nA,B,C\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("metadata.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_file_with_only_untitled_rows_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, "title,journal
,J
NA,K
").unwrap();

        let ds = load_file(&path).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.schema.column_count(), 2);
    }

    #[test]
    fn test_load_file_and_shared_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, "title,journal\nA,J\nB,\n").unwrap();

        let first = shared(&path).unwrap();
        assert_eq!(first.len(), 2);

        std::fs::remove_file(&path).unwrap();
        let second = shared(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_parse_publish_time_formats() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(parse_publish_time("2020-03-15"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020/03/15"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("03/15/2020"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15T10:30:00"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15T10:30:00Z"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15T10:30:00.000000Z"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15 10:30:00+00:00"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020-03-15T23:30:00-05:00"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020 Mar 15"), d(2020, 3, 15));
        assert_eq!(parse_publish_time("2020"), d(2020, 1, 1));
        assert_eq!(parse_publish_time("2020-05"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020 May"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020 june"), d(2020, 6, 1));
        assert_eq!(parse_publish_time("2020 SEPTEMBER"), d(2020, 9, 1));
        assert_eq!(parse_publish_time("2020-13"), None);
        assert_eq!(parse_publish_time("20"), None);
        assert_eq!(parse_publish_time("unknown"), None);
    }

    #[test]
    fn test_month_words_must_match_exactly() {
        assert_eq!(parse_publish_time("2020 junk"), None);
        assert_eq!(parse_publish_time("2020 Mayhem"), None);
        assert_eq!(parse_publish_time("2020 December-ish"), None);
        assert_eq!(parse_publish_time("2020 Sept"), None);

        let ds = load("title,publish_time
A,2020 junk
B,2020 Jun
");
        assert_eq!(ds.records[0].publication_year, None);
        assert_eq!(ds.records[1].publication_year, Some(2020));
    }
}
