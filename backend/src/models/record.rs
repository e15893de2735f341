//! Input records and grouping parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GroupingError, MetricField};

/// One row of the uploaded table.
///
/// `id` is the page URL. Uniqueness is expected for a clean export but is not
/// enforced anywhere in the grouping path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "url")]
    pub id: String,
    pub traffic: f64,
    pub revenue: f64,
}

impl Record {
    pub fn new(id: impl Into<String>, traffic: f64, revenue: f64) -> Self {
        Self {
            id: id.into(),
            traffic,
            revenue,
        }
    }

    /// Value of the given metric for this record.
    pub fn metric(&self, metric: PriorityMetric) -> f64 {
        match metric {
            PriorityMetric::Traffic => self.traffic,
            PriorityMetric::Revenue => self.revenue,
        }
    }

    /// Reject negative or non-finite metric values. `row` is the record's
    /// position in the input and only used for the error message.
    pub fn check_values(&self, row: usize) -> Result<(), GroupingError> {
        for (field, value) in [
            (MetricField::Traffic, self.traffic),
            (MetricField::Revenue, self.revenue),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GroupingError::InvalidValue {
                    row,
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Column used to rank records before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityMetric {
    #[default]
    Revenue,
    Traffic,
}

impl PriorityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityMetric::Revenue => "revenue",
            PriorityMetric::Traffic => "traffic",
        }
    }
}

impl fmt::Display for PriorityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(PriorityMetric::Revenue),
            "traffic" => Ok(PriorityMetric::Traffic),
            other => Err(format!(
                "Unknown priority metric '{}'. Use 'revenue' or 'traffic'.",
                other
            )),
        }
    }
}

/// Coverage thresholds in whole percent.
///
/// Always strictly increasing, each within `1..=100`, and ending at 100 so the
/// last group spans every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Thresholds(Vec<u32>);

impl Thresholds {
    pub const DEFAULT: [u32; 5] = [20, 40, 60, 80, 100];

    pub fn new(values: Vec<u32>) -> Result<Self, GroupingError> {
        if values.is_empty() {
            return Err(GroupingError::InvalidThresholds(
                "at least one threshold is required".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|t| **t == 0 || **t > 100) {
            return Err(GroupingError::InvalidThresholds(format!(
                "threshold {} is outside 1..=100",
                bad
            )));
        }
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GroupingError::InvalidThresholds(
                "thresholds must be strictly increasing".to_string(),
            ));
        }
        if values.last() != Some(&100) {
            return Err(GroupingError::InvalidThresholds(
                "the last threshold must be 100".to_string(),
            ));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl FromStr for Thresholds {
    type Err = GroupingError;

    /// Parse a comma separated list such as `"20,40,60,80,100"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>().map_err(|_| {
                    GroupingError::InvalidThresholds(format!("'{}' is not a whole percentage", part))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }
}

impl<'de> Deserialize<'de> for Thresholds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<u32>::deserialize(deserializer)?;
        Thresholds::new(values).map_err(serde::de::Error::custom)
    }
}
