//! Initiatives Dashboard Service
//!
//! Backend for a corporate initiatives dashboard: employees browse, create
//! and track sustainability and social-impact initiatives, customers browse
//! public ones and support or donate to them.
//!
//! # Architecture
//!
//! - `model`: raw initiatives, enhanced initiatives, users
//! - `enhance`: pure, seed-driven derivation of synthetic operational metadata
//! - `storage`: injected key-value store behind typed "local storage" buckets
//! - `services`: layout, preferences, notifications, collaboration, metrics
//! - `repository`: one async interface over the flat file, a remote server,
//!   and a cache-or-fetch policy
//! - `filter`: filtering, sorting, facets and summaries
//! - `users`: the flat-file user store
//! - `http`: the JSON API
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use initiatives::enhance::enhance_initiatives;
//! use initiatives::filter::{apply, FilterCriteria, SortKey};
//! use initiatives::model::Initiative;
//!
//! let raw = vec![
//!     Initiative::new("challenge-1", "Acme", "Clean Water").with_theme("Water"),
//!     Initiative::new("challenge-2", "Globex", "Solar Schools").with_theme("Education"),
//! ];
//!
//! let enhanced = enhance_initiatives(&raw, Utc::now());
//! let education = apply(&enhanced, &FilterCriteria::new().theme("education"), SortKey::Alphabetical);
//! assert_eq!(education.len(), 1);
//! assert_eq!(education[0].milestones[0].title, "Project Initiation");
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod enhance;
pub mod filter;
pub mod http;
pub mod model;
pub mod repository;
pub mod services;
pub mod storage;
pub mod users;

// Re-export main types for convenience
pub use config::{ConfigError, ServerConfig};
pub use enhance::{enhance_initiative, enhance_initiatives};
pub use filter::{FilterCriteria, SortKey};
pub use http::{AppState, HttpServer};
pub use model::{EnhancedInitiative, Initiative, InitiativeId, InitiativeStatus};
pub use repository::{
    CachedRepository, FileRepository, InitiativeRepository, RemoteRepository, RepositoryError,
    RepositoryResult,
};
pub use storage::{Bucket, FileStore, KeyValueStore, LocalStorage, MemoryStore};
pub use users::{UserError, UserResult, UserStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.3.0");
    }
}
