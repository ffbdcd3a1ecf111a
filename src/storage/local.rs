//! Local-storage facade: typed, default-on-failure access to fixed buckets

use super::kv::{KeyValueStore, MemoryStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Well-known storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    InitiativesCache,
    DashboardLayout,
    UserPreferences,
    Notifications,
    CollaborationData,
    MetricsHistory,
    /// Authentication stub: the signed-in user record
    CurrentUser,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::InitiativesCache,
        Bucket::DashboardLayout,
        Bucket::UserPreferences,
        Bucket::Notifications,
        Bucket::CollaborationData,
        Bucket::MetricsHistory,
        Bucket::CurrentUser,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            Bucket::InitiativesCache => "initiatives_cache",
            Bucket::DashboardLayout => "dashboard_layout",
            Bucket::UserPreferences => "user_preferences",
            Bucket::Notifications => "notifications",
            Bucket::CollaborationData => "collaboration_data",
            Bucket::MetricsHistory => "metrics_history",
            Bucket::CurrentUser => "current_user",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Typed accessors over an injected key-value store.
///
/// Reads never fail: a missing value, an unparsable value, a backend error,
/// or a detached facade (no backend at all) all yield the caller's default.
/// Writes replace the whole value and report success as a boolean.
#[derive(Clone)]
pub struct LocalStorage {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl LocalStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Facade with a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Facade with no backend. Reads return defaults, writes report `false`.
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get_from_local_storage<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(backend) = &self.backend else {
            return default;
        };

        match backend.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Discarding unparsable value under {}: {}", key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                default
            }
        }
    }

    pub fn set_to_local_storage<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let Some(backend) = &self.backend else {
            debug!("Storage unavailable, dropping write to {}", key);
            return false;
        };

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize value for {}: {}", key, e);
                return false;
            }
        };

        match backend.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write {}: {}", key, e);
                false
            }
        }
    }

    pub fn remove_from_local_storage(&self, key: &str) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };

        match backend.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove {}: {}", key, e);
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, bucket: Bucket, default: T) -> T {
        self.get_from_local_storage(bucket.key(), default)
    }

    pub fn set<T: Serialize + ?Sized>(&self, bucket: Bucket, value: &T) -> bool {
        self.set_to_local_storage(bucket.key(), value)
    }

    pub fn remove(&self, bucket: Bucket) -> bool {
        self.remove_from_local_storage(bucket.key())
    }

    /// Whether the bucket currently holds any value
    pub fn contains(&self, bucket: Bucket) -> bool {
        self.backend
            .as_ref()
            .and_then(|backend| backend.get(bucket.key()).ok().flatten())
            .is_some()
    }
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorage")
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_keys_are_distinct() {
        let mut keys: Vec<&str> = Bucket::ALL.iter().map(|b| b.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Bucket::ALL.len());
    }

    #[test]
    fn test_detached_returns_default() {
        let storage = LocalStorage::detached();
        assert!(!storage.set(Bucket::UserPreferences, &vec![1, 2, 3]));
        assert_eq!(storage.get(Bucket::UserPreferences, vec![9]), vec![9]);
        assert!(!storage.remove(Bucket::UserPreferences));
    }

    #[test]
    fn test_corrupted_value_returns_default() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("notifications", "{not json").unwrap();

        let storage = LocalStorage::new(backend);
        let value: Vec<String> = storage.get(Bucket::Notifications, Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_quota_failure_reports_false() {
        let storage = LocalStorage::new(Arc::new(MemoryStore::with_quota(8)));
        assert!(!storage.set(Bucket::MetricsHistory, &"a long value that will not fit"));
        assert!(!storage.contains(Bucket::MetricsHistory));
    }
}
