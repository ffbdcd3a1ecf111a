//! User records held in the users flat file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a user did for an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationKind {
    Support,
    Donate,
}

impl fmt::Display for ParticipationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipationKind::Support => f.write_str("support"),
            ParticipationKind::Donate => f.write_str("donate"),
        }
    }
}

impl FromStr for ParticipationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(ParticipationKind::Support),
            "donate" => Ok(ParticipationKind::Donate),
            other => Err(format!("unknown participation: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub initiative_id: String,
    pub action: ParticipationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub at: DateTime<Utc>,
}

/// A stored user. `password` holds a salted digest, never plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub friend_ids: Vec<String>,
    #[serde(default)]
    pub participation: Vec<Participation>,
}

/// The outward view of a user, without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub points: u64,
    pub friend_ids: Vec<String>,
    pub participation: Vec<Participation>,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            points: user.points,
            friend_ids: user.friend_ids.clone(),
            participation: user.participation.clone(),
        }
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub friend_ids: Vec<String>,
}

impl NewUser {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}
