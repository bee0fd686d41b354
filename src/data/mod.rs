/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  metadata.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset (loaded once, shared)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, Schema + Capabilities
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + journal → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts, histogram, top journals, word bag → Summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
