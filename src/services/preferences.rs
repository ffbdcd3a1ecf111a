//! User preferences bucket

use super::{persist, ServiceResult};
use crate::filter::SortKey;
use crate::storage::{Bucket, LocalStorage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub default_sort: SortKey,
    pub favorite_themes: Vec<String>,
    pub region: Option<String>,
    pub email_digest: bool,
    pub compact_view: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Recent,
            favorite_themes: Vec::new(),
            region: None,
            email_digest: true,
            compact_view: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferencesService {
    storage: LocalStorage,
}

impl PreferencesService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> UserPreferences {
        self.storage.get(Bucket::UserPreferences, UserPreferences::default())
    }

    pub fn save(&self, preferences: &UserPreferences) -> ServiceResult<()> {
        persist(&self.storage, Bucket::UserPreferences, preferences)
    }

    /// Read, modify and write back the whole preferences value
    pub fn update<F>(&self, change: F) -> ServiceResult<UserPreferences>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let mut preferences = self.get();
        change(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}
