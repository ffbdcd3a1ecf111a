//! Notifications bucket
//!
//! The "read" flag is the one piece of state the system mutates in place.

use super::{persist, ServiceError, ServiceResult};
use crate::storage::{Bucket, LocalStorage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Update,
    Milestone,
    Support,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<String>,
}

impl Notification {
    /// Unread notification with a fresh id, stamped now
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
            initiative_id: None,
        }
    }

    pub fn for_initiative(mut self, uid: impl Into<String>) -> Self {
        self.initiative_id = Some(uid.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    storage: LocalStorage,
}

impl NotificationService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Newest first
    pub fn list(&self) -> Vec<Notification> {
        self.storage.get(Bucket::Notifications, Vec::new())
    }

    pub fn unread_count(&self) -> usize {
        self.list().iter().filter(|n| !n.read).count()
    }

    pub fn push(&self, notification: Notification) -> ServiceResult<()> {
        let mut all = self.list();
        debug!("Pushing notification {}", notification.id);
        all.insert(0, notification);
        persist(&self.storage, Bucket::Notifications, &all)
    }

    pub fn mark_read(&self, id: &str) -> ServiceResult<Notification> {
        let mut all = self.list();
        let notification = all
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        notification.read = true;
        let updated = notification.clone();
        persist(&self.storage, Bucket::Notifications, &all)?;
        Ok(updated)
    }

    /// Returns how many notifications changed state
    pub fn mark_all_read(&self) -> ServiceResult<usize> {
        let mut all = self.list();
        let mut changed = 0;
        for notification in all.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        if changed > 0 {
            persist(&self.storage, Bucket::Notifications, &all)?;
        }
        Ok(changed)
    }

    pub fn clear(&self) -> bool {
        self.storage.remove(Bucket::Notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_mark_read() {
        let service = NotificationService::new(LocalStorage::in_memory());
        let first = Notification::new(NotificationKind::Info, "Welcome", "Hello");
        let second = Notification::new(NotificationKind::Milestone, "Pilot", "Pilot launched")
            .for_initiative("c-1");
        let first_id = first.id.clone();

        service.push(first).unwrap();
        service.push(second).unwrap();
        assert_eq!(service.list()[0].title, "Pilot");
        assert_eq!(service.unread_count(), 2);

        let updated = service.mark_read(&first_id).unwrap();
        assert!(updated.read);
        assert_eq!(service.unread_count(), 1);

        assert_eq!(service.mark_all_read().unwrap(), 1);
        assert_eq!(service.mark_all_read().unwrap(), 0);
    }

    #[test]
    fn test_mark_unknown_is_not_found() {
        let service = NotificationService::new(LocalStorage::in_memory());
        assert!(matches!(service.mark_read("nope"), Err(ServiceError::NotFound(_))));
    }
}
