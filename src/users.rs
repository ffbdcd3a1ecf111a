//! Flat-file user store

use crate::model::{NewUser, Participation, ParticipationKind, UserRecord};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Points granted per support action
pub const SUPPORT_POINTS: u64 = 10;

/// Largest single donation accepted
pub const MAX_DONATION: f64 = 1_000_000_000.0;

const DIGEST_SCHEME: &str = "sha256";

/// User store errors
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Invalid user: {0}")]
    Validation(String),

    #[error("Email already registered: {0}")]
    Conflict(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type UserResult<T> = Result<T, UserError>;

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Donation amounts must be finite, positive and at most [`MAX_DONATION`]
pub fn validate_donation(amount: Option<f64>) -> UserResult<f64> {
    match amount {
        Some(a) if a.is_finite() && a > 0.0 && a <= MAX_DONATION => Ok(a),
        Some(a) => Err(UserError::Validation(format!(
            "donation amount must be greater than zero and at most {}, got {}",
            MAX_DONATION, a
        ))),
        None => Err(UserError::Validation(
            "donation amount is required".to_string(),
        )),
    }
}

/// `sha256$<salt>$<hex digest>`
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}${}${}", DIGEST_SCHEME, salt, digest(&salt, password))
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(DIGEST_SCHEME), Some(salt), Some(expected)) => digest(salt, candidate) == expected,
        _ => false,
    }
}

/// Users held as one JSON array, rewritten wholesale on every change
pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> UserResult<Vec<UserRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, users: &[UserRecord]) -> UserResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string_pretty(users)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub async fn list(&self) -> UserResult<Vec<UserRecord>> {
        self.read().await
    }

    pub async fn get(&self, id: &str) -> UserResult<Option<UserRecord>> {
        Ok(self.read().await?.into_iter().find(|u| u.id == id))
    }

    pub async fn create(&self, new_user: NewUser) -> UserResult<UserRecord> {
        let missing = new_user.missing_fields();
        if !missing.is_empty() {
            return Err(UserError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let email = new_user.email.trim().to_string();
        let _guard = self.write_lock.lock().await;
        let mut users = self.read().await?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(UserError::Conflict(email));
        }

        let user = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name: new_user.name.trim().to_string(),
            password: hash_password(&new_user.password),
            points: 0,
            friend_ids: new_user.friend_ids,
            participation: Vec::new(),
        };
        users.push(user.clone());
        self.write(&users).await?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    /// Log a support or donation against an initiative and award points.
    ///
    /// Supports earn a flat amount; donations earn one point per whole unit.
    pub async fn record_participation(
        &self,
        user_id: &str,
        initiative_id: &str,
        kind: ParticipationKind,
        amount: Option<f64>,
    ) -> UserResult<UserRecord> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.read().await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        let points = match kind {
            ParticipationKind::Support => SUPPORT_POINTS,
            ParticipationKind::Donate => amount.unwrap_or(0.0).max(0.0).floor() as u64,
        };
        user.points = user.points.saturating_add(points);
        user.participation.push(Participation {
            initiative_id: initiative_id.to_string(),
            action: kind,
            amount,
            at: Utc::now(),
        });
        let updated = user.clone();
        self.write(&users).await?;

        debug!("User {} {} {} (+{} points)", user_id, kind, initiative_id, points);
        Ok(updated)
    }
}
