use chrono::NaiveDate;

/// Column holding the paper title. Required.
pub const TITLE_COLUMN: &str = "title";
/// Optional journal column.
pub const JOURNAL_COLUMN: &str = "journal";
/// Optional publication date column.
pub const PUBLISH_TIME_COLUMN: &str = "publish_time";
/// Column derived from `publish_time` during cleaning.
pub const YEAR_COLUMN: &str = "publication_year";

// ---------------------------------------------------------------------------
// Record – one row of the cleaned metadata table
// ---------------------------------------------------------------------------

/// A single research paper entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub journal: Option<String>,
    pub publish_time: Option<NaiveDate>,
    /// Year of `publish_time`. `None` whenever the date is missing or
    /// could not be parsed.
    pub publication_year: Option<i32>,
}

impl Record {
    /// Build a record, deriving the year from the parsed date.
    pub fn new(title: String, journal: Option<String>, publish_time: Option<NaiveDate>) -> Self {
        use chrono::Datelike;
        Record {
            title,
            journal,
            publish_time,
            publication_year: publish_time.map(|d| d.year()),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – which columns the cleaned table has
// ---------------------------------------------------------------------------

/// Optional features available for the loaded table.
///
/// Computed once at load time and consulted by the filter engine and the
/// aggregator instead of re-checking column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The source had a `journal` column.
    pub journal: bool,
    /// The source had a `publish_time` column, so `publication_year` exists.
    pub publication_year: bool,
}

/// Column layout of the cleaned table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Source header columns followed by derived ones.
    pub columns: Vec<String>,
    pub capabilities: Capabilities,
}

impl Schema {
    /// Derive the cleaned schema from a CSV header row.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = headers.into_iter().map(Into::into).collect();
        let has = |name: &str| columns.iter().any(|c| c == name);

        let capabilities = Capabilities {
            journal: has(JOURNAL_COLUMN),
            publication_year: has(PUBLISH_TIME_COLUMN),
        };
        if capabilities.publication_year && !has(YEAR_COLUMN) {
            columns.push(YEAR_COLUMN.to_string());
        }

        Schema {
            columns,
            capabilities,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned metadata table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub schema: Schema,
}

impl Dataset {
    pub fn new(records: Vec<Record>, schema: Schema) -> Self {
        Dataset { records, schema }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.schema.capabilities
    }

    /// `(min, max)` over all present publication years.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        year_bounds(self.records.iter())
    }
}

/// `(min, max)` over the present years of `records`, `None` if no record
/// has a year.
pub fn year_bounds<'a, I>(records: I) -> Option<(i32, i32)>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|r| r.publication_year)
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}
