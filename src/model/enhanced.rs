//! Enhanced initiatives: raw records plus derived operational metadata

use super::initiative::Initiative;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InitiativeStatus {
    Planning,
    Implementation,
    Active,
    Completed,
    Evaluation,
}

impl InitiativeStatus {
    /// All statuses in lifecycle order
    pub const ALL: [InitiativeStatus; 5] = [
        InitiativeStatus::Planning,
        InitiativeStatus::Implementation,
        InitiativeStatus::Active,
        InitiativeStatus::Completed,
        InitiativeStatus::Evaluation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InitiativeStatus::Planning => "planning",
            InitiativeStatus::Implementation => "implementation",
            InitiativeStatus::Active => "active",
            InitiativeStatus::Completed => "completed",
            InitiativeStatus::Evaluation => "evaluation",
        }
    }

    /// Position in the lifecycle, starting at 0 for `Planning`
    pub fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitiativeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar_initials: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: InitiativeStatus,
    pub changed_at: DateTime<Utc>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub id: String,
    pub author: String,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub id: String,
    pub period: String,
    pub summary: String,
    pub metric_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub allocated: u64,
    pub spent: u64,
    pub currency: String,
}

/// A raw initiative augmented with synthetic, seed-derived metadata.
///
/// Derived on every load and never persisted in this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedInitiative {
    #[serde(flatten)]
    pub initiative: Initiative,

    pub seed: u64,
    pub status: InitiativeStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub progress: u8,
    pub budget: Budget,
    pub team_members: Vec<TeamMember>,
    pub milestones: Vec<Milestone>,
    pub status_history: Vec<StatusChange>,
    pub updates: Vec<ProjectUpdate>,
    pub resources: Vec<Resource>,
    pub impact_reports: Vec<ImpactReport>,
}

impl EnhancedInitiative {
    pub fn uid(&self) -> &str {
        self.initiative.uid.as_str()
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Active".parse::<InitiativeStatus>(), Ok(InitiativeStatus::Active));
        assert_eq!(InitiativeStatus::Evaluation.to_string(), "evaluation");
        assert!("paused".parse::<InitiativeStatus>().is_err());
    }

    #[test]
    fn test_status_ordinal_follows_lifecycle() {
        assert_eq!(InitiativeStatus::Planning.ordinal(), 0);
        assert_eq!(InitiativeStatus::Evaluation.ordinal(), 4);
    }
}
