use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::scoring::RiskLevel;

pub const DEFAULT_CAPACITY: usize = 10;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of assessments kept per session before the oldest is evicted
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub total_score: f64,
    pub level: RiskLevel,
    pub region_key: String,
}

impl SessionRecord {
    pub fn new(total_score: f64, level: RiskLevel, region_key: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            total_score,
            level,
            region_key: region_key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl LevelCounts {
    fn bump(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }
}

/// Summary of the records currently held in a session.
///
/// `average`, `min` and `max` are `None` for an empty session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub count: usize,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub levels: LevelCounts,
    /// Latest score minus the oldest score still in the window
    pub trend: Option<f64>,
}

/// Bounded rolling window of assessment outcomes for one session.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    capacity: usize,
    records: VecDeque<SessionRecord>,
}

impl SessionAggregator {
    /// Create an aggregator holding at most `capacity` records (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a record, evicting the oldest beyond capacity, and summarize.
    pub fn record(&mut self, record: SessionRecord) -> SessionStats {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
        self.stats()
    }

    /// Recompute stats from the buffer contents.
    pub fn stats(&self) -> SessionStats {
        let count = self.records.len();
        if count == 0 {
            return SessionStats::default();
        }

        let mut levels = LevelCounts::default();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for record in &self.records {
            sum += record.total_score;
            min = min.min(record.total_score);
            max = max.max(record.total_score);
            levels.bump(record.level);
        }

        let trend = match (self.records.front(), self.records.back()) {
            (Some(first), Some(last)) if count > 1 => Some(last.total_score - first.total_score),
            _ => None,
        };

        SessionStats {
            count,
            average: Some(sum / count as f64),
            min: Some(min),
            max: Some(max),
            levels,
            trend,
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
