//! Collaboration bucket: watchers and comments per initiative

use super::{persist, ServiceResult};
use crate::storage::{Bucket, LocalStorage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collaboration {
    pub watchers: Vec<String>,
    pub comments: Vec<Comment>,
}

/// Initiative uid -> collaboration state
pub type CollaborationData = BTreeMap<String, Collaboration>;

#[derive(Debug, Clone)]
pub struct CollaborationService {
    storage: LocalStorage,
}

impl CollaborationService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn all(&self) -> CollaborationData {
        self.storage.get(Bucket::CollaborationData, CollaborationData::new())
    }

    pub fn get(&self, uid: &str) -> Collaboration {
        self.all().remove(uid).unwrap_or_default()
    }

    pub fn add_comment(&self, uid: &str, author: &str, body: &str) -> ServiceResult<Comment> {
        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.to_string(),
            body: body.to_string(),
            posted_at: Utc::now(),
        };

        let mut data = self.all();
        data.entry(uid.to_string())
            .or_default()
            .comments
            .push(comment.clone());
        persist(&self.storage, Bucket::CollaborationData, &data)?;
        Ok(comment)
    }

    /// Flip whether `user_id` watches `uid`. Returns the new state.
    pub fn toggle_watcher(&self, uid: &str, user_id: &str) -> ServiceResult<bool> {
        let mut data = self.all();
        let watchers = &mut data.entry(uid.to_string()).or_default().watchers;

        let watching = match watchers.iter().position(|w| w == user_id) {
            Some(index) => {
                watchers.remove(index);
                false
            }
            None => {
                watchers.push(user_id.to_string());
                true
            }
        };

        persist(&self.storage, Bucket::CollaborationData, &data)?;
        Ok(watching)
    }
}
