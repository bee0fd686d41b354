use std::collections::HashSet;

use super::model::{Dataset, Record};

/// Maximum number of journals offered in the journal selector.
pub const JOURNAL_CHOICE_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive publication year range. `lo > hi` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        YearRange { lo, hi }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }
}

/// Exact-match journal constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JournalFilter {
    #[default]
    All,
    Only(String),
}

impl JournalFilter {
    fn matches(&self, journal: Option<&str>) -> bool {
        match self {
            JournalFilter::All => true,
            JournalFilter::Only(want) => journal == Some(want.as_str()),
        }
    }
}

/// The user's current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// `None` means no year constraint.
    pub years: Option<YearRange>,
    pub journal: JournalFilter,
}

impl FilterCriteria {
    /// Criteria spanning the whole dataset: full year bounds, any journal.
    pub fn unconstrained(dataset: &Dataset) -> Self {
        FilterCriteria {
            years: dataset
                .year_bounds()
                .map(|(lo, hi)| YearRange::new(lo, hi)),
            journal: JournalFilter::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset passing a set of criteria, in dataset order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        FilteredView { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + 'a {
        let (dataset, indices) = (self.dataset, self.indices);
        indices.iter().map(move |&i| &dataset.records[i])
    }

    /// The first `n` records of the view.
    pub fn sample(&self, n: usize) -> impl Iterator<Item = &'a Record> + 'a {
        self.records().take(n)
    }
}

/// Return indices of records that pass `criteria`.
///
/// A record passes when:
/// * the year step is skipped, or its year is present and inside the range
/// * the journal step is skipped, or its journal equals the constraint
///
/// The year step is skipped when the criteria carry no range or the dataset
/// has no parseable years at all; the journal step when the dataset has no
/// journal column.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    let caps = dataset.capabilities();

    let years = criteria
        .years
        .filter(|_| caps.publication_year && dataset.year_bounds().is_some());

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| match years {
            None => true,
            Some(range) => rec.publication_year.is_some_and(|y| range.contains(y)),
        })
        .filter(|(_, rec)| !caps.journal || criteria.journal.matches(rec.journal.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// The first `limit` distinct journal names in encounter order.
pub fn journal_choices(dataset: &Dataset, limit: usize) -> Vec<String> {
    if !dataset.capabilities().journal {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    dataset
        .records
        .iter()
        .filter_map(|r| r.journal.as_deref())
        .filter(|j| seen.insert(*j))
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_from_reader;

    fn sample_dataset() -> Dataset {
        load_from_reader(
            "title,journal,publish_time\n\
             Paper one,Lancet,2018-01-01\n\
             Paper two,BMJ,2019-05-05\n\
             Paper three,Lancet,2020-02-02\n\
             Paper four,,2020-07-07\n\
             Paper five,Nature,\n"
                .as_bytes(),
        )
        .unwrap()
    }

    fn criteria(lo: i32, hi: i32, journal: JournalFilter) -> FilterCriteria {
        FilterCriteria {
            years: Some(YearRange::new(lo, hi)),
            journal,
        }
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &criteria(2019, 2020, JournalFilter::All));
        assert_eq!(idx, vec![1, 2, 3]);
    }

    #[test]
    fn test_absent_year_excluded_when_year_filter_active() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::unconstrained(&ds));
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_vacuous_range_is_empty() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &criteria(2021, 2018, JournalFilter::All));
        let view = FilteredView::new(&ds, &idx);
        assert!(view.is_empty());
        assert_eq!(view.sample(10).count(), 0);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = sample_dataset();
        let c = criteria(2018, 2020, JournalFilter::Only("Lancet".into()));
        let once = filtered_indices(&ds, &c);
        let twice = filtered_indices(&ds, &c);
        assert_eq!(once, vec![0, 2]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_journal_yields_empty_view() {
        let ds = sample_dataset();
        let c = criteria(2018, 2020, JournalFilter::Only("Cell".into()));
        assert!(filtered_indices(&ds, &c).is_empty());
    }

    #[test]
    fn test_no_publish_time_column_bypasses_year_filter() {
        let ds = load_from_reader("title,journal\nA,J\nB,K\n".as_bytes()).unwrap();
        assert!(FilterCriteria::unconstrained(&ds).years.is_none());
        let idx = filtered_indices(&ds, &criteria(2000, 2001, JournalFilter::All));
        assert_eq!(idx, vec![0, 1]);
    }

    #[test]
    fn test_no_parseable_years_bypasses_year_filter() {
        let ds = load_from_reader("title,publish_time\nA,soon\nB,\n".as_bytes()).unwrap();
        let idx = filtered_indices(&ds, &criteria(2000, 2001, JournalFilter::All));
        assert_eq!(idx, vec![0, 1]);
    }

    #[test]
    fn test_journal_filter_ignored_without_journal_column() {
        let ds = load_from_reader("title\nA\nB\n".as_bytes()).unwrap();
        let c = FilterCriteria {
            years: None,
            journal: JournalFilter::Only("Lancet".into()),
        };
        assert_eq!(filtered_indices(&ds, &c), vec![0, 1]);
    }

    #[test]
    fn test_view_sample_and_records() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::default());
        let view = FilteredView::new(&ds, &idx);
        assert_eq!(view.len(), 5);
        let titles: Vec<&str> = view.sample(2).map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper one", "Paper two"]);
    }

    #[test]
    fn test_journal_choices_in_encounter_order() {
        let ds = sample_dataset();
        assert_eq!(journal_choices(&ds, 20), vec!["Lancet", "BMJ", "Nature"]);
        assert_eq!(journal_choices(&ds, 2), vec!["Lancet", "BMJ"]);
    }
}
