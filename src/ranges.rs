//! Typical value ranges per metric.
//!
//! The table is plain configuration: the curated defaults below are
//! hand-tuned, not derived, and can be replaced wholesale from a JSON file
//! keyed by metric id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
    pub typical_low: f64,
    pub typical_high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFit {
    /// Inside the typical band, bounds included.
    Typical,
    /// Outside the typical band but within `[min, max]`.
    Atypical,
    /// Outside `[min, max]`.
    Implausible,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricRangeTable {
    ranges: HashMap<Metric, MetricRange>,
}

#[derive(Debug, Error)]
pub enum RangeTableError {
    #[error("failed to read range table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid range table json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid range for {metric}: {reason}")]
    InvalidRange { metric: String, reason: String },
}

impl MetricRange {
    pub const fn new(min: f64, max: f64, typical_low: f64, typical_high: f64) -> Self {
        Self {
            min,
            max,
            typical_low,
            typical_high,
        }
    }

    pub fn classify(&self, value: f64) -> RangeFit {
        if value >= self.typical_low && value <= self.typical_high {
            RangeFit::Typical
        } else if value >= self.min && value <= self.max {
            RangeFit::Atypical
        } else {
            RangeFit::Implausible
        }
    }

    fn check(&self) -> Result<(), String> {
        let all_finite = [self.min, self.max, self.typical_low, self.typical_high]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("bounds must be finite".to_string());
        }
        if !(self.min <= self.typical_low
            && self.typical_low <= self.typical_high
            && self.typical_high <= self.max)
        {
            return Err(format!(
                "expected min <= typical_low <= typical_high <= max, got {} / {} / {} / {}",
                self.min, self.typical_low, self.typical_high, self.max
            ));
        }
        Ok(())
    }
}

impl MetricRangeTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn curated() -> Self {
        [
            (Metric::WinRate, MetricRange::new(20.0, 90.0, 40.0, 70.0)),
            (Metric::PointsPerGame, MetricRange::new(0.5, 3.0, 1.2, 2.3)),
            (Metric::DrawPercentage, MetricRange::new(15.0, 50.0, 25.0, 35.0)),
            (Metric::LossPercentage, MetricRange::new(10.0, 60.0, 20.0, 40.0)),
            (Metric::GoalsScored, MetricRange::new(0.3, 4.0, 1.0, 2.5)),
            (Metric::GoalsConceded, MetricRange::new(0.2, 3.0, 0.8, 1.8)),
            (
                Metric::CleanSheetsPercentage,
                MetricRange::new(15.0, 70.0, 30.0, 50.0),
            ),
            (Metric::BttsPercentage, MetricRange::new(30.0, 85.0, 55.0, 70.0)),
            (Metric::Over25Percentage, MetricRange::new(30.0, 80.0, 50.0, 65.0)),
            (Metric::Under25Percentage, MetricRange::new(30.0, 80.0, 40.0, 60.0)),
            (Metric::TotalGoalsAvg, MetricRange::new(1.0, 4.5, 2.0, 3.0)),
        ]
        .into_iter()
        .collect()
    }

    /// Replaces or inserts one range. Invalid ranges are rejected.
    pub fn with_range(
        mut self,
        metric: Metric,
        range: MetricRange,
    ) -> Result<Self, RangeTableError> {
        range.check().map_err(|reason| RangeTableError::InvalidRange {
            metric: metric.id().to_string(),
            reason,
        })?;
        self.ranges.insert(metric, range);
        Ok(self)
    }

    pub fn get(&self, metric: &Metric) -> Option<&MetricRange> {
        self.ranges.get(metric)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RangeTableError> {
        let parsed: HashMap<String, MetricRange> = serde_json::from_str(raw)?;
        parsed
            .into_iter()
            .try_fold(Self::empty(), |table, (id, range)| {
                table.with_range(Metric::parse(&id), range)
            })
    }

    pub fn load_json(path: &Path) -> Result<Self, RangeTableError> {
        let raw = fs::read_to_string(path).map_err(|source| RangeTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

impl FromIterator<(Metric, MetricRange)> for MetricRangeTable {
    fn from_iter<I: IntoIterator<Item = (Metric, MetricRange)>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}
