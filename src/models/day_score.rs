use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One weighted component of the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    pub raw: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl SubScore {
    pub fn new(raw: f64, weight: f64) -> Self {
        SubScore {
            raw,
            weight,
            contribution: raw * weight,
        }
    }
}

/// Full composite-score breakdown for the dashboard detail panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub duration: SubScore,
    pub bedroom: SubScore,
    pub journal: SubScore,
    pub composite: u8,
}

/// Relative weights of the three sub-scores. Sanitized copies always sum
/// to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub duration: f64,
    pub bedroom: f64,
    pub journal: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            duration: 0.4,
            bedroom: 0.4,
            journal: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Clamp each weight to [0, 1] and renormalize to sum 1.0. A malformed
    /// set that sums to zero falls back to the defaults.
    pub fn normalized(self) -> ScoreWeights {
        let duration = self.duration.clamp(0.0, 1.0);
        let bedroom = self.bedroom.clamp(0.0, 1.0);
        let journal = self.journal.clamp(0.0, 1.0);

        let sum = duration + bedroom + journal;
        if sum <= f64::EPSILON {
            return ScoreWeights::default();
        }

        ScoreWeights {
            duration: duration / sum,
            bedroom: bedroom / sum,
            journal: journal / sum,
        }
    }
}

/// Per-day scoring record consumed by the calendar ring renderer. The
/// three ratios are 0-1; `composite` keeps the undivided 0-100 score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayScore {
    pub date: NaiveDate,
    pub sleep_score: f64,
    pub bedroom_score: f64,
    pub journal_presence: f64,
    pub composite: u8,
}

/// Render-ready ring values for one calendar day, zeros where no data
/// exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingDay {
    pub date: NaiveDate,
    pub sleep: f64,
    pub bedroom: f64,
    pub journal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub average_score: f64,
    pub day_count: usize,
    pub low_day_count: usize,
    pub days: BTreeMap<NaiveDate, DayScore>,
}

/// In-memory cache of the last dashboard refresh.
#[derive(Debug, Default)]
pub struct ScoreCache {
    pub user_id: Option<String>,
    pub summary: Option<DashboardSummary>,
}
