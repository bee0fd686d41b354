use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use super::filter::FilteredView;
use super::model::year_bounds;

/// Number of journals shown in the top-journals chart.
pub const TOP_JOURNALS: usize = 10;
/// Maximum number of distinct words drawn in the word cloud.
pub const MAX_CLOUD_WORDS: usize = 200;

/// Words excluded from the title word bag.
pub const STOP_WORDS: &[&str] = &["the", "and", "of", "in", "to", "a", "for", "with", "on"];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").unwrap());

// ---------------------------------------------------------------------------
// Tally – counts kept in first-encounter order
// ---------------------------------------------------------------------------

/// A multiset of strings. Each distinct value is stored once, in the order
/// it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    total: usize,
    counts: Vec<(String, usize)>,
    position: HashMap<String, usize>,
}

impl Tally {
    pub fn insert(&mut self, item: &str) {
        self.total += 1;
        match self.position.get(item) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.position.insert(item.to_string(), self.counts.len());
                self.counts.push((item.to_string(), 1));
            }
        }
    }

    /// Number of inserted items, duplicates included.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct items with their counts, in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// The `n` most frequent items, descending by count. Ties keep
    /// first-encounter order.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted: Vec<(&str, usize)> = self.iter().collect();
        // `sort_by` is stable, so equal counts stay in encounter order.
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
            .into_iter()
            .take(n)
            .map(|(s, c)| (s.to_string(), c))
            .collect()
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for item in iter {
            tally.insert(item);
        }
        tally
    }
}

// ---------------------------------------------------------------------------
// Summary – everything the dashboard shows for one filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_count: usize,
    pub column_count: usize,
    /// `None` when the schema has no year column or no year is present.
    pub year_bounds: Option<(i32, i32)>,
    /// `None` when the schema has no year column.
    pub year_histogram: Option<Vec<(i32, usize)>>,
    /// `None` when the schema has no journal column.
    pub top_journals: Option<Vec<(String, usize)>>,
    /// Number of title words after stop-word removal, duplicates included.
    pub word_count: usize,
    pub word_frequencies: Vec<(String, usize)>,
}

impl Summary {
    /// Compute every aggregate for `view`, skipping those whose column is
    /// absent from the schema.
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let caps = view.dataset().capabilities();

        let word_bag = title_word_bag(view.records().map(|r| r.title.as_str()));

        Summary {
            total_count: view.len(),
            column_count: view.dataset().schema.column_count(),
            year_bounds: caps
                .publication_year
                .then(|| year_bounds(view.records()))
                .flatten(),
            year_histogram: caps
                .publication_year
                .then(|| year_histogram(view.records().filter_map(|r| r.publication_year))),
            top_journals: caps.journal.then(|| {
                top_journals(
                    view.records().filter_map(|r| r.journal.as_deref()),
                    TOP_JOURNALS,
                )
            }),
            word_count: word_bag.len(),
            word_frequencies: word_frequencies(&word_bag, MAX_CLOUD_WORDS),
        }
    }
}

// ---------------------------------------------------------------------------
// Individual aggregates
// ---------------------------------------------------------------------------

/// Count of records per distinct year, ascending by year.
pub fn year_histogram<I>(years: I) -> Vec<(i32, usize)>
where
    I: IntoIterator<Item = i32>,
{
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for y in years {
        *counts.entry(y).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// The `n` most frequent journals, descending by count. Ties keep the order
/// in which the journals were first encountered.
pub fn top_journals<'a, I>(journals: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    journals.into_iter().collect::<Tally>().most_common(n)
}

/// Lower-cased title tokens of at least three ASCII letters, minus stop words.
pub fn title_word_bag<'a, I>(titles: I) -> Tally
where
    I: IntoIterator<Item = &'a str>,
{
    let mut bag = Tally::default();
    for title in titles {
        let lower = title.to_lowercase();
        WORD_RE
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|w| !STOP_WORDS.contains(w))
            .for_each(|w| bag.insert(w));
    }
    if bag.is_empty() {
        log::debug!("No title words left after stop-word removal");
    }
    bag
}

/// Word counts of `bag`, most frequent first, at most `max` entries.
pub fn word_frequencies(bag: &Tally, max: usize) -> Vec<(String, usize)> {
    bag.most_common(max)
}
