//! Initiative repositories
//!
//! One asynchronous interface over every place raw initiatives come from:
//! the flat JSON file, a remote server, or a cache-or-fetch policy layered
//! over either of them.

pub mod cached;
pub mod file;
pub mod remote;

pub use cached::CachedRepository;
pub use file::FileRepository;
pub use remote::RemoteRepository;

use crate::model::Initiative;
use async_trait::async_trait;
use thiserror::Error;

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Required fields missing or malformed
    #[error("Invalid initiative: {0}")]
    Validation(String),

    /// An initiative with this uid already exists
    #[error("Initiative already exists: {0}")]
    Conflict(String),

    #[error("Initiative not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote server answered with a failure envelope
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// In-place edit applied to one stored initiative
pub type Change = Box<dyn FnOnce(&mut Initiative) + Send>;

#[async_trait]
pub trait InitiativeRepository: Send + Sync {
    /// Every raw initiative, in stored order
    async fn load_all(&self) -> RepositoryResult<Vec<Initiative>>;

    /// Add a new initiative. Rejects blank required fields and duplicate uids.
    async fn append(&self, initiative: Initiative) -> RepositoryResult<Initiative>;

    /// Replace the initiative with the same uid
    async fn update(&self, initiative: Initiative) -> RepositoryResult<Initiative>;

    /// Apply `change` to the initiative with this uid and store the result.
    /// The read, the change and the write form one step with respect to
    /// other writers of the same repository. The uid cannot be changed.
    async fn modify(&self, uid: &str, change: Change) -> RepositoryResult<Initiative>;

    async fn find(&self, uid: &str) -> RepositoryResult<Option<Initiative>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|i| i.uid.as_str() == uid))
    }
}

/// Run `change` on a copy and check the result is still storable
pub(crate) fn apply_change(current: &Initiative, change: Change) -> RepositoryResult<Initiative> {
    let mut changed = current.clone();
    change(&mut changed);
    if changed.uid != current.uid {
        return Err(RepositoryError::Validation(format!(
            "uid cannot change ({} -> {})",
            current.uid, changed.uid
        )));
    }
    validate(&changed)?;
    Ok(changed)
}

pub(crate) fn validate(initiative: &Initiative) -> RepositoryResult<()> {
    let missing = initiative.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RepositoryError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
