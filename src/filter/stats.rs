//! Facets for filter dropdowns and summary figures for metric tiles

use crate::model::{EnhancedInitiative, InitiativeStatus};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Distinct classification values, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub themes: Vec<String>,
    pub regions: Vec<String>,
    pub phases: Vec<String>,
    pub statuses: Vec<InitiativeStatus>,
}

pub fn facets(records: &[EnhancedInitiative]) -> Facets {
    let mut themes = IndexSet::new();
    let mut regions = IndexSet::new();
    let mut phases = IndexSet::new();
    let mut statuses = IndexSet::new();

    for record in records {
        let initiative = &record.initiative;
        for (set, value) in [
            (&mut themes, initiative.theme()),
            (&mut regions, initiative.region()),
            (&mut phases, initiative.phase()),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        }
        statuses.insert(record.status);
    }

    Facets {
        themes: themes.into_iter().collect(),
        regions: regions.into_iter().collect(),
        phases: phases.into_iter().collect(),
        statuses: statuses.into_iter().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub public: usize,
    /// Mean impact score, absent scores counting as zero
    pub average_impact: f64,
    /// Every status in lifecycle order, including zero counts
    pub by_status: IndexMap<InitiativeStatus, usize>,
    pub total_supporters: u64,
    pub total_donations: f64,
    pub budget_allocated: u64,
    pub budget_spent: u64,
    pub milestones_completed: usize,
    pub milestones_total: usize,
}

pub fn summarize(records: &[EnhancedInitiative]) -> Summary {
    let mut by_status: IndexMap<InitiativeStatus, usize> =
        InitiativeStatus::ALL.iter().map(|s| (*s, 0)).collect();

    let mut summary = Summary {
        total: records.len(),
        public: 0,
        average_impact: 0.0,
        by_status: IndexMap::new(),
        total_supporters: 0,
        total_donations: 0.0,
        budget_allocated: 0,
        budget_spent: 0,
        milestones_completed: 0,
        milestones_total: 0,
    };

    let mut impact_sum = 0.0;
    for record in records {
        let initiative = &record.initiative;
        if initiative.is_public() {
            summary.public += 1;
        }
        impact_sum += initiative.impact_score();
        *by_status.entry(record.status).or_insert(0) += 1;
        summary.total_supporters += initiative.supporters();
        summary.total_donations += initiative.donations();
        summary.budget_allocated += record.budget.allocated;
        summary.budget_spent += record.budget.spent;
        summary.milestones_completed += record.completed_milestones();
        summary.milestones_total += record.milestones.len();
    }

    if !records.is_empty() {
        summary.average_impact = (impact_sum / records.len() as f64 * 10.0).round() / 10.0;
    }
    summary.by_status = by_status;
    summary
}
