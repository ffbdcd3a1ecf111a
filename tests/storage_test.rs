use initiatives::model::Initiative;
use initiatives::services::{
    DashboardLayout, Notification, NotificationKind, Services, UserPreferences,
};
use initiatives::storage::{Bucket, FileStore, KeyValueStore, LocalStorage, MemoryStore};
use initiatives::SortKey;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_default_when_empty() {
    let storage = LocalStorage::in_memory();
    let value: HashMap<String, u32> = storage.get_from_local_storage("missing", HashMap::new());
    assert!(value.is_empty());
}

#[test]
fn test_default_when_corrupted() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(Bucket::DashboardLayout.key(), "[[[").unwrap();

    let storage = LocalStorage::new(backend);
    assert_eq!(
        storage.get(Bucket::DashboardLayout, DashboardLayout::default()),
        DashboardLayout::default()
    );
}

#[test]
fn test_default_when_detached() {
    let storage = LocalStorage::detached();
    assert_eq!(storage.get_from_local_storage("anything", 42u32), 42);
    assert!(!storage.set_to_local_storage("anything", &7u32));
}

#[test]
fn test_round_trip_every_bucket_shape() {
    let storage = LocalStorage::in_memory();

    let initiatives = vec![
        Initiative::new("c-1", "Acme", "Clean Water").with_theme("Water"),
        Initiative::new("c-2", "Globex", "Solar Schools").with_impact_score(70.0),
    ];
    assert!(storage.set(Bucket::InitiativesCache, &initiatives));
    assert_eq!(
        storage.get::<Vec<Initiative>>(Bucket::InitiativesCache, Vec::new()),
        initiatives
    );

    let mut preferences = UserPreferences::default();
    preferences.default_sort = SortKey::Alphabetical;
    preferences.region = Some("Europe".to_string());
    assert!(storage.set(Bucket::UserPreferences, &preferences));
    assert_eq!(
        storage.get(Bucket::UserPreferences, UserPreferences::default()),
        preferences
    );

    let notifications = vec![Notification::new(NotificationKind::Alert, "Budget", "Over")];
    assert!(storage.set(Bucket::Notifications, &notifications));
    assert_eq!(
        storage.get::<Vec<Notification>>(Bucket::Notifications, Vec::new()),
        notifications
    );
}

#[test]
fn test_last_writer_wins() {
    let storage = LocalStorage::in_memory();
    assert!(storage.set_to_local_storage("k", &vec!["a"]));
    assert!(storage.set_to_local_storage("k", &vec!["b", "c"]));
    assert_eq!(
        storage.get_from_local_storage::<Vec<String>>("k", Vec::new()),
        vec!["b".to_string(), "c".to_string()]
    );
}

#[test]
fn test_read_flags_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let id = {
        let store = FileStore::open(temp_dir.path()).unwrap();
        let services = Services::new(LocalStorage::new(Arc::new(store)));
        let notification = Notification::new(NotificationKind::Update, "Update", "Pilot live");
        let id = notification.id.clone();
        services.notifications.push(notification).unwrap();
        services.notifications.mark_read(&id).unwrap();
        id
    };

    let store = FileStore::open(temp_dir.path()).unwrap();
    let services = Services::new(LocalStorage::new(Arc::new(store)));
    let list = services.notifications.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
    assert!(list[0].read);
    assert_eq!(services.notifications.unread_count(), 0);
}

#[test]
fn test_quota_exceeded_surfaces_as_write_failure() {
    let services = Services::new(LocalStorage::new(Arc::new(MemoryStore::with_quota(64))));
    let big = vec![Initiative::new("c-1", "Acme", "x".repeat(200))];
    assert!(services.cache.set(&big).is_err());
    assert!(services.cache.get().is_none());
}
