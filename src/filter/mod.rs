//! Filtering, sorting and aggregate views over enhanced initiatives
//!
//! Everything here is recomputed per request: a linear scan with predicate
//! conjunction, one stable sort, and single-pass aggregation. No indexes.

pub mod criteria;
pub mod stats;

pub use criteria::{apply, FilterCriteria, SortKey};
pub use stats::{facets, summarize, Facets, Summary};
