//! Filter criteria and sort keys over enhanced initiatives

use crate::model::{EnhancedInitiative, InitiativeStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How to order a filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first; records without a timestamp last
    #[default]
    Recent,
    /// Highest impact score first
    Impact,
    /// Title, A to Z, ignoring case
    Alphabetical,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Recent => f.write_str("recent"),
            SortKey::Impact => f.write_str("impact"),
            SortKey::Alphabetical => f.write_str("alphabetical"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(SortKey::Recent),
            "impact" => Ok(SortKey::Impact),
            "alphabetical" | "title" => Ok(SortKey::Alphabetical),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

impl SortKey {
    pub fn compare(&self, a: &EnhancedInitiative, b: &EnhancedInitiative) -> Ordering {
        match self {
            SortKey::Recent => {
                match (a.initiative.last_updated_at(), b.initiative.last_updated_at()) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
            SortKey::Impact => b
                .initiative
                .impact_score()
                .total_cmp(&a.initiative.impact_score()),
            SortKey::Alphabetical => a
                .initiative
                .title
                .to_lowercase()
                .cmp(&b.initiative.title.to_lowercase()),
        }
    }
}

/// User-selected filters. Empty or absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over title, company, challenge, solution and theme
    pub search: Option<String>,
    pub theme: Option<String>,
    pub region: Option<String>,
    pub phase: Option<String>,
    pub status: Option<InitiativeStatus>,
    /// Restrict to initiatives visible to customers
    #[serde(rename = "public")]
    pub public_only: bool,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn equals_ignore_case(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(wanted) => wanted.eq_ignore_ascii_case(actual.trim()),
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn status(mut self, status: InitiativeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }

    /// True when no criterion restricts anything
    pub fn is_empty(&self) -> bool {
        is_blank(&self.search)
            && is_blank(&self.theme)
            && is_blank(&self.region)
            && is_blank(&self.phase)
            && self.status.is_none()
            && !self.public_only
    }

    pub fn matches(&self, record: &EnhancedInitiative) -> bool {
        let initiative = &record.initiative;

        if self.public_only && !initiative.is_public() {
            return false;
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if !equals_ignore_case(&self.theme, initiative.theme())
            || !equals_ignore_case(&self.region, initiative.region())
            || !equals_ignore_case(&self.phase, initiative.phase())
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    initiative.title.as_str(),
                    initiative.company.as_str(),
                    initiative.challenge.as_str(),
                    initiative.solution.as_str(),
                    initiative.theme(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Filter then sort, in one pass plus one stable sort
pub fn apply<'a>(
    records: &'a [EnhancedInitiative],
    criteria: &FilterCriteria,
    sort: SortKey,
) -> Vec<&'a EnhancedInitiative> {
    let mut selected: Vec<&EnhancedInitiative> =
        records.iter().filter(|r| criteria.matches(r)).collect();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}
