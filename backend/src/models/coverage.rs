//! Grouper output: the ranked sequence and the per-threshold groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::{PriorityMetric, Record};

/// A record at its position in the ranked sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    /// Position in the input table.
    pub input_row: usize,
    pub record: Record,
    /// Cumulative traffic share up to and including this position, in percent.
    pub cumulative_traffic_pct: f64,
    /// Cumulative revenue share up to and including this position, in percent.
    pub cumulative_revenue_pct: f64,
}

/// Records sorted descending by the priority metric with running shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSequence {
    pub priority: PriorityMetric,
    pub records: Vec<RankedRecord>,
    pub total_traffic: f64,
    pub total_revenue: f64,
}

impl RankedSequence {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `len` ranked records.
    pub fn prefix(&self, len: usize) -> &[RankedRecord] {
        &self.records[..len.min(self.records.len())]
    }
}

/// The prefix of ranked records selected for one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGroup {
    pub threshold: u32,
    pub prefix_length: usize,
    pub achieved_traffic_pct: f64,
    pub achieved_revenue_pct: f64,
}

impl CoverageGroup {
    /// Summary label, e.g. `First 20%`.
    pub fn label(&self) -> String {
        format!("First {}%", self.threshold)
    }

    /// Export sheet tag, e.g. `Top_20_Percent`.
    pub fn sheet_tag(&self) -> String {
        format!("Top_{}_Percent", self.threshold)
    }
}

/// Everything the grouper derives from one input snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageOutcome {
    pub ranked: RankedSequence,
    pub groups: Vec<CoverageGroup>,
}

impl CoverageOutcome {
    /// Ranked records belonging to `group`.
    pub fn members(&self, group: &CoverageGroup) -> &[RankedRecord] {
        self.ranked.prefix(group.prefix_length)
    }

    /// Group for a threshold, if it was requested.
    pub fn group(&self, threshold: u32) -> Option<&CoverageGroup> {
        self.groups.iter().find(|g| g.threshold == threshold)
    }

    /// Threshold → ordered records of that group. Groups overlap: every
    /// record of a smaller threshold repeats in all larger ones.
    pub fn ranked_export(&self) -> BTreeMap<u32, Vec<Record>> {
        self.groups
            .iter()
            .map(|group| {
                let records = self
                    .members(group)
                    .iter()
                    .map(|r| r.record.clone())
                    .collect();
                (group.threshold, records)
            })
            .collect()
    }
}
