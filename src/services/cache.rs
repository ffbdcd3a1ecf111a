//! Initiatives cache and the current-user authentication stub

use super::{persist, ServiceResult};
use crate::model::{Initiative, PublicUser};
use crate::storage::{Bucket, LocalStorage};

/// Cache of the raw initiative list
#[derive(Debug, Clone)]
pub struct InitiativeCache {
    storage: LocalStorage,
}

impl InitiativeCache {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Cached list, or `None` when nothing usable is cached
    pub fn get(&self) -> Option<Vec<Initiative>> {
        self.storage.get(Bucket::InitiativesCache, None)
    }

    pub fn set(&self, initiatives: &[Initiative]) -> ServiceResult<()> {
        persist(&self.storage, Bucket::InitiativesCache, initiatives)
    }

    pub fn clear(&self) -> bool {
        self.storage.remove(Bucket::InitiativesCache)
    }
}

/// The signed-in user, held in storage with no further authentication
#[derive(Debug, Clone)]
pub struct CurrentUserService {
    storage: LocalStorage,
}

impl CurrentUserService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Option<PublicUser> {
        self.storage.get(Bucket::CurrentUser, None)
    }

    pub fn sign_in(&self, user: &PublicUser) -> ServiceResult<()> {
        persist(&self.storage, Bucket::CurrentUser, user)
    }

    pub fn sign_out(&self) -> bool {
        self.storage.remove(Bucket::CurrentUser)
    }
}
