//! Metrics history bucket: bounded series of dashboard snapshots

use super::{persist, ServiceResult};
use crate::filter::Summary;
use crate::storage::{Bucket, LocalStorage};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Snapshots kept; older ones are dropped on append
pub const METRICS_HISTORY_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub total: usize,
    pub average_impact: f64,
    pub by_status: IndexMap<String, usize>,
}

impl MetricsSnapshot {
    pub fn from_summary(summary: &Summary, recorded_at: DateTime<Utc>) -> Self {
        Self {
            recorded_at,
            total: summary.total,
            average_impact: summary.average_impact,
            by_status: summary
                .by_status
                .iter()
                .map(|(status, count)| (status.to_string(), *count))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsService {
    storage: LocalStorage,
}

impl MetricsService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Oldest first
    pub fn history(&self) -> Vec<MetricsSnapshot> {
        self.storage.get(Bucket::MetricsHistory, Vec::new())
    }

    pub fn latest(&self) -> Option<MetricsSnapshot> {
        self.history().pop()
    }

    pub fn record(&self, snapshot: MetricsSnapshot) -> ServiceResult<()> {
        let mut history = self.history();
        history.push(snapshot);
        if history.len() > METRICS_HISTORY_LIMIT {
            let excess = history.len() - METRICS_HISTORY_LIMIT;
            history.drain(..excess);
        }
        persist(&self.storage, Bucket::MetricsHistory, &history)
    }
}
