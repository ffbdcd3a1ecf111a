//! Raw initiative records as stored in the flat JSON file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an initiative (the `uid` field on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct InitiativeId(String);

impl InitiativeId {
    pub fn new(id: impl Into<String>) -> Self {
        InitiativeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for InitiativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InitiativeId {
    fn from(s: &str) -> Self {
        InitiativeId(s.to_string())
    }
}

impl From<String> for InitiativeId {
    fn from(s: String) -> Self {
        InitiativeId(s)
    }
}

/// A corporate social or environmental program, as submitted.
///
/// Free-text fields default to the empty string and optional classification
/// fields stay `None` when absent from the source JSON. Nothing here is
/// validated beyond what serde requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub uid: InitiativeId,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub challenge: String,

    #[serde(default)]
    pub solution: String,

    #[serde(default)]
    pub call_to_action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<f64>,

    /// Kept as the raw string so a malformed timestamp never fails a load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Customer-facing views only list public initiatives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporters: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donations: Option<f64>,
}

impl Initiative {
    /// Create an initiative with the required fields and nothing else set
    pub fn new(
        uid: impl Into<InitiativeId>,
        company: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            company: company.into(),
            title: title.into(),
            challenge: String::new(),
            solution: String::new(),
            call_to_action: String::new(),
            theme: None,
            region: None,
            phase: None,
            impact_score: None,
            last_updated: None,
            is_public: None,
            supporters: None,
            donations: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn with_impact_score(mut self, score: f64) -> Self {
        self.impact_score = Some(score);
        self
    }

    pub fn with_last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at.to_rfc3339());
        self
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or_default()
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }

    pub fn phase(&self) -> &str {
        self.phase.as_deref().unwrap_or_default()
    }

    pub fn impact_score(&self) -> f64 {
        self.impact_score.unwrap_or(0.0)
    }

    /// Parsed `lastUpdated`. Unparsable values read as absent.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_public(&self) -> bool {
        self.is_public.unwrap_or(true)
    }

    pub fn supporters(&self) -> u64 {
        self.supporters.unwrap_or(0)
    }

    pub fn donations(&self) -> f64 {
        self.donations.unwrap_or(0.0)
    }

    /// Names of required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.uid.is_empty() {
            missing.push("uid");
        }
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.company.trim().is_empty() {
            missing.push("company");
        }
        missing
    }
}
