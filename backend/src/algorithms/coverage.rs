//! Balanced coverage groups.
//!
//! Records are ranked by the priority metric and, for every threshold `t`, the
//! group is the longest ranked prefix in which each position has a cumulative
//! traffic share **or** a cumulative revenue share of at most `t` percent.
//! A non-empty prefix that stops short of the full sequence is then extended by
//! one record, since the threshold is crossed between the last qualifying
//! record and the next one.
//!
//! The extension never fires for an empty prefix, so the lowest group can be
//! legitimately empty when the top-ranked record alone already exceeds the
//! threshold on both metrics. The one exception is a single-record table,
//! where every group is that record.
//!
//! # Complexity
//!
//! One stable sort plus a single forward pass: prefixes are nested, so the
//! qualifying pointer only moves forward as thresholds increase.
//!
//! # Example
//!
//! ```
//! use tro_rust::algorithms::coverage::compute_groups;
//! use tro_rust::models::{PriorityMetric, Record, Thresholds};
//!
//! let records = vec![
//!     Record::new("a", 100.0, 10.0),
//!     Record::new("b", 50.0, 90.0),
//!     Record::new("c", 10.0, 0.0),
//! ];
//! let outcome = compute_groups(&records, PriorityMetric::Revenue, &Thresholds::default()).unwrap();
//! assert_eq!(outcome.groups[0].prefix_length, 0);
//! assert_eq!(outcome.groups[4].prefix_length, 3);
//! ```

use log::debug;
use std::cmp::Ordering;

use crate::error::GroupingError;
use crate::models::{
    CoverageGroup, CoverageOutcome, PriorityMetric, RankedRecord, RankedSequence, Record,
    Thresholds,
};

/// Rank `records` and build one coverage group per threshold.
///
/// # Errors
///
/// * [`GroupingError::EmptyInput`] when `records` is empty
/// * [`GroupingError::InvalidValue`] for the first record with a negative or
///   non-finite metric
pub fn compute_groups(
    records: &[Record],
    priority: PriorityMetric,
    thresholds: &Thresholds,
) -> Result<CoverageOutcome, GroupingError> {
    if records.is_empty() {
        return Err(GroupingError::EmptyInput);
    }
    for (row, record) in records.iter().enumerate() {
        record.check_values(row)?;
    }

    let ranked = rank_records(records, priority);
    let groups = select_groups(&ranked, thresholds);

    Ok(CoverageOutcome { ranked, groups })
}

/// Stable descending sort by `priority`, annotated with cumulative shares.
///
/// Ties keep their input order. Totals are the final running sums in ranked
/// order, so the last position of a metric with a positive total is exactly
/// 100. A zero total yields 0 at every position.
pub fn rank_records(records: &[Record], priority: PriorityMetric) -> RankedSequence {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        records[b]
            .metric(priority)
            .partial_cmp(&records[a].metric(priority))
            .unwrap_or(Ordering::Equal)
    });

    let mut running_traffic = Vec::with_capacity(order.len());
    let mut running_revenue = Vec::with_capacity(order.len());
    let (mut traffic_sum, mut revenue_sum) = (0.0_f64, 0.0_f64);
    for &idx in &order {
        traffic_sum += records[idx].traffic;
        revenue_sum += records[idx].revenue;
        running_traffic.push(traffic_sum);
        running_revenue.push(revenue_sum);
    }

    let ranked = order
        .iter()
        .enumerate()
        .map(|(pos, &idx)| RankedRecord {
            input_row: idx,
            record: records[idx].clone(),
            cumulative_traffic_pct: share_pct(running_traffic[pos], traffic_sum),
            cumulative_revenue_pct: share_pct(running_revenue[pos], revenue_sum),
        })
        .collect();

    RankedSequence {
        priority,
        records: ranked,
        total_traffic: traffic_sum,
        total_revenue: revenue_sum,
    }
}

/// Build the groups for every threshold in one forward pass.
pub fn select_groups(ranked: &RankedSequence, thresholds: &Thresholds) -> Vec<CoverageGroup> {
    let n = ranked.len();
    let mut qualifying = 0;
    let mut groups = Vec::with_capacity(thresholds.len());

    for threshold in thresholds.iter() {
        let limit = f64::from(threshold);
        while qualifying < n && qualifies(&ranked.records[qualifying], limit) {
            qualifying += 1;
        }

        let prefix_length = extend_boundary(qualifying, n);
        debug!(
            "threshold {}%: {} qualifying, group of {} of {} records",
            threshold, qualifying, prefix_length, n
        );

        groups.push(summarize(ranked, threshold, prefix_length));
    }

    groups
}

/// A position qualifies when either cumulative share is within `limit`.
fn qualifies(record: &RankedRecord, limit: f64) -> bool {
    record.cumulative_traffic_pct <= limit || record.cumulative_revenue_pct <= limit
}

/// Include the record that crosses the threshold, unless nothing qualified or
/// everything already did. A single-record table always forms a full group.
fn extend_boundary(qualifying: usize, n: usize) -> usize {
    if n == 1 {
        1
    } else if qualifying > 0 && qualifying < n {
        qualifying + 1
    } else {
        qualifying
    }
}

fn summarize(ranked: &RankedSequence, threshold: u32, prefix_length: usize) -> CoverageGroup {
    let (achieved_traffic_pct, achieved_revenue_pct) = match prefix_length.checked_sub(1) {
        Some(last) => {
            let boundary = &ranked.records[last];
            (
                boundary.cumulative_traffic_pct,
                boundary.cumulative_revenue_pct,
            )
        }
        None => (0.0, 0.0),
    };

    CoverageGroup {
        threshold,
        prefix_length,
        achieved_traffic_pct,
        achieved_revenue_pct,
    }
}

/// `part` as a percentage of `total`, or 0 when the total is 0.
fn share_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
