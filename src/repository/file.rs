//! Flat-file repository over a JSON array of raw initiatives

use super::{apply_change, validate, Change, InitiativeRepository, RepositoryError, RepositoryResult};
use crate::model::Initiative;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Reads and rewrites the whole file on every operation.
///
/// Writes within one process are serialized; separate processes sharing the
/// file are not coordinated.
pub struct FileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> RepositoryResult<Vec<Initiative>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No initiatives file at {:?}, starting empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write(&self, initiatives: &[Initiative]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(initiatives)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl InitiativeRepository for FileRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<Initiative>> {
        self.read().await
    }

    async fn append(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        validate(&initiative)?;

        let _guard = self.write_lock.lock().await;
        let mut all = self.read().await?;
        if all.iter().any(|i| i.uid == initiative.uid) {
            return Err(RepositoryError::Conflict(initiative.uid.to_string()));
        }
        all.push(initiative.clone());
        self.write(&all).await?;

        info!("Appended initiative {} ({} total)", initiative.uid, all.len());
        Ok(initiative)
    }

    async fn update(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        validate(&initiative)?;

        let _guard = self.write_lock.lock().await;
        let mut all = self.read().await?;
        let slot = all
            .iter_mut()
            .find(|i| i.uid == initiative.uid)
            .ok_or_else(|| RepositoryError::NotFound(initiative.uid.to_string()))?;
        *slot = initiative.clone();
        self.write(&all).await?;

        debug!("Updated initiative {}", initiative.uid);
        Ok(initiative)
    }

    async fn modify(&self, uid: &str, change: Change) -> RepositoryResult<Initiative> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read().await?;
        let slot = all
            .iter_mut()
            .find(|i| i.uid.as_str() == uid)
            .ok_or_else(|| RepositoryError::NotFound(uid.to_string()))?;
        let changed = apply_change(slot, change)?;
        *slot = changed.clone();
        self.write(&all).await?;
        debug!("Modified initiative {}", uid);
        Ok(changed)
    }
}
