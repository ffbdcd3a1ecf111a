//! Typed services over the local-storage buckets
//!
//! Each service owns one bucket and reads/writes the whole value at once.
//! There is no partial update: the last writer wins.

pub mod cache;
pub mod collaboration;
pub mod layout;
pub mod metrics;
pub mod notifications;
pub mod preferences;

pub use cache::{CurrentUserService, InitiativeCache};
pub use collaboration::{Collaboration, CollaborationData, CollaborationService, Comment};
pub use layout::{DashboardLayout, LayoutService, Widget, WidgetKind};
pub use metrics::{MetricsService, MetricsSnapshot, METRICS_HISTORY_LIMIT};
pub use notifications::{Notification, NotificationKind, NotificationService};
pub use preferences::{PreferencesService, UserPreferences};

use crate::storage::{Bucket, LocalStorage};
use thiserror::Error;

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No entry with that id in the bucket
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store refused the write
    #[error("Failed to write bucket {0}")]
    WriteFailed(Bucket),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn persist<T: serde::Serialize + ?Sized>(
    storage: &LocalStorage,
    bucket: Bucket,
    value: &T,
) -> ServiceResult<()> {
    if storage.set(bucket, value) {
        Ok(())
    } else {
        Err(ServiceError::WriteFailed(bucket))
    }
}

/// All services sharing one storage facade
#[derive(Debug, Clone)]
pub struct Services {
    storage: LocalStorage,
    pub cache: InitiativeCache,
    pub layout: LayoutService,
    pub preferences: PreferencesService,
    pub notifications: NotificationService,
    pub collaboration: CollaborationService,
    pub metrics: MetricsService,
    pub current_user: CurrentUserService,
}

impl Services {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            cache: InitiativeCache::new(storage.clone()),
            layout: LayoutService::new(storage.clone()),
            preferences: PreferencesService::new(storage.clone()),
            notifications: NotificationService::new(storage.clone()),
            collaboration: CollaborationService::new(storage.clone()),
            metrics: MetricsService::new(storage.clone()),
            current_user: CurrentUserService::new(storage.clone()),
            storage,
        }
    }

    /// False when running detached from any backend
    pub fn storage_available(&self) -> bool {
        self.storage.is_available()
    }
}
