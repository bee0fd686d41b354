use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::aggregate::Summary;
use crate::data::filter::{
    filtered_indices, journal_choices, FilterCriteria, FilteredView, JournalFilter, YearRange,
    JOURNAL_CHOICE_LIMIT,
};
use crate::data::loader::SharedDataset;
use crate::data::model::Dataset;
use crate::ui::word_cloud::CloudCache;

/// Rows shown in the sample table.
pub const SAMPLE_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the dataset was read from.
    pub data_path: PathBuf,

    /// Loaded dataset, read-only for the whole session.
    pub dataset: Option<Arc<Dataset>>,

    /// Shown instead of the dashboard when loading failed.
    pub load_error: Option<String>,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// Journals offered by the journal selector (without "All").
    pub journal_choices: Vec<String>,

    /// Full-dataset year bounds, used as slider limits.
    pub year_limits: Option<(i32, i32)>,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates of the visible records (cached).
    pub summary: Summary,

    /// Word cloud layout of `summary`, kept across repaints.
    pub cloud: CloudCache,
}

impl AppState {
    /// Build the state from the outcome of the startup load.
    pub fn new(data_path: &Path, loaded: SharedDataset) -> Self {
        let mut state = AppState {
            data_path: data_path.to_path_buf(),
            dataset: None,
            load_error: None,
            criteria: FilterCriteria::default(),
            journal_choices: Vec::new(),
            year_limits: None,
            visible_indices: Vec::new(),
            summary: Summary::default(),
            cloud: CloudCache::default(),
        };
        match loaded {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                state.load_error = Some(format!(
                    "Could not load {}: {e}. Please ensure it's in the same directory.",
                    data_path.display()
                ));
            }
        }
        state
    }

    /// Ingest the loaded dataset and initialise filters.
    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::unconstrained(&dataset);
        self.journal_choices = journal_choices(&dataset, JOURNAL_CHOICE_LIMIT);
        self.year_limits = dataset.year_bounds();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and `summary` after a filter change and
    /// drop the stale word cloud layout.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.criteria);
            self.summary = Summary::compute(&FilteredView::new(ds, &self.visible_indices));
            self.cloud.invalidate();
            log::debug!(
                "Filter {:?} keeps {} of {} papers",
                self.criteria,
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    /// The records passing the current filters.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::new(ds, &self.visible_indices))
    }

    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        let range = Some(YearRange::new(lo, hi));
        if self.criteria.years != range {
            self.criteria.years = range;
            self.refilter();
        }
    }

    pub fn set_journal(&mut self, journal: JournalFilter) {
        if self.criteria.journal != journal {
            self.criteria.journal = journal;
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_from_reader, LoadError};

    fn loaded(csv: &str) -> SharedDataset {
        Ok(Arc::new(load_from_reader(csv.as_bytes()).unwrap()))
    }

    const CSV: &str = "title,journal,publish_time\n\
                       Covid and Lungs,Lancet,2019-03-01\n\
                       The Vaccine Study,BMJ,2020-01-01\n\
                       Masks,Lancet,2021-06-01\n";

    #[test]
    fn test_initial_state_shows_everything() {
        let state = AppState::new(Path::new("metadata.csv"), loaded(CSV));
        assert!(state.load_error.is_none());
        assert_eq!(state.year_limits, Some((2019, 2021)));
        assert_eq!(state.journal_choices, vec!["Lancet", "BMJ"]);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.summary.total_count, 3);
        assert_eq!(state.view().map(|v| v.len()), Some(3));
    }

    #[test]
    fn test_filter_changes_update_summary() {
        let mut state = AppState::new(Path::new("metadata.csv"), loaded(CSV));
        state.set_year_range(2020, 2021);
        assert_eq!(state.summary.total_count, 2);
        assert_eq!(state.summary.year_bounds, Some((2020, 2021)));

        state.set_journal(JournalFilter::Only("Lancet".into()));
        assert_eq!(state.visible_indices, vec![2]);
        assert_eq!(state.summary.word_count, 1);
        assert_eq!(state.summary.word_frequencies, vec![("masks".to_string(), 1)]);

        state.set_journal(JournalFilter::All);
        assert_eq!(state.summary.total_count, 2);
    }

    #[test]
    fn test_cloud_layout_recomputed_only_after_filter_change() {
        use crate::ui::word_cloud::CLOUD_SIZE;

        let mut state = AppState::new(Path::new("metadata.csv"), loaded(CSV));
        let mut runs = 0;
        let mut repaint = |state: &mut AppState| {
            state.cloud.get_or_layout(CLOUD_SIZE, || {
                runs += 1;
                Vec::new()
            });
        };

        repaint(&mut state);
        repaint(&mut state);
        state.set_year_range(2019, 2021);
        repaint(&mut state);
        state.set_year_range(2020, 2021);
        repaint(&mut state);
        repaint(&mut state);
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_load_failure_becomes_single_message() {
        let err: SharedDataset = Err(Arc::new(LoadError::MissingColumn("title")));
        let state = AppState::new(Path::new("metadata.csv"), err);
        assert!(state.dataset.is_none());
        assert!(state.view().is_none());
        let msg = state.load_error.unwrap();
        assert!(msg.starts_with("Could not load metadata.csv"));
        assert!(msg.contains("title"));
    }
}
