//! Recommendation engine.
//!
//! Rules are evaluated in priority order and the first match wins:
//! plateau → regression → progress → training frequency → neutral.
//! Fewer than `minimum_records` records short-circuits to
//! [`Recommendation::InsufficientData`].

use chrono::{DateTime, Utc};
use ironset_protocol::{ExerciseRecord, UserProfile};
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-9;
const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachConfig {
    /// How many recent records of an exercise are considered.
    pub window: usize,
    pub minimum_records: usize,
    /// Reps every plateau set must reach before a weight increase is suggested.
    pub plateau_reps: u32,
    pub increment_min: f64,
    pub increment_max: f64,
    /// How many recent session dates feed the frequency rule.
    pub frequency_window: usize,
    pub sparse_gap_days: f64,
    pub dense_gap_days: f64,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            window: 5,
            minimum_records: 3,
            plateau_reps: 10,
            increment_min: 2.5,
            increment_max: 5.0,
            frequency_window: 4,
            sparse_gap_days: 7.0,
            dense_gap_days: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    InsufficientData { records: usize, needed: usize },
    IncreaseWeight { current: f64, min: f64, max: f64 },
    FocusOnTechnique { latest: f64, earlier: f64 },
    Progress { latest: f64, gain: f64 },
    TrainMoreOften { average_gap_days: f64 },
    RecoverMore { average_gap_days: f64 },
    KeepGoing,
}

#[derive(Debug, Clone, Default)]
pub struct Coach {
    config: CoachConfig,
}

impl Coach {
    pub fn new(config: CoachConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Recommendation for one exercise of `profile`, from archived sessions.
    pub fn recommend_for(&self, profile: &UserProfile, exercise: &str) -> Recommendation {
        let records = profile.recent_records(exercise, self.config.window);
        self.recommend(&records, &profile.session_dates())
    }

    /// `records` must be most recent first; `session_dates` in any order.
    pub fn recommend(
        &self,
        records: &[&ExerciseRecord],
        session_dates: &[DateTime<Utc>],
    ) -> Recommendation {
        let needed = self.config.minimum_records.max(3);
        if records.len() < needed {
            return Recommendation::InsufficientData {
                records: records.len(),
                needed,
            };
        }

        let latest = records[0];
        let two_back = records[2];

        let plateau = records[..3]
            .iter()
            .all(|r| same_weight(r.weight, latest.weight) && r.reps >= self.config.plateau_reps);
        if plateau {
            return Recommendation::IncreaseWeight {
                current: latest.weight,
                min: latest.weight + self.config.increment_min,
                max: latest.weight + self.config.increment_max,
            };
        }

        if latest.weight < two_back.weight - WEIGHT_TOLERANCE {
            return Recommendation::FocusOnTechnique {
                latest: latest.weight,
                earlier: two_back.weight,
            };
        }

        if latest.weight > two_back.weight + WEIGHT_TOLERANCE {
            return Recommendation::Progress {
                latest: latest.weight,
                gain: latest.weight - two_back.weight,
            };
        }

        self.frequency_advice(session_dates)
            .unwrap_or(Recommendation::KeepGoing)
    }

    /// Average gap over the last `frequency_window` dates, when it falls
    /// outside the comfortable band.
    pub fn frequency_advice(&self, session_dates: &[DateTime<Utc>]) -> Option<Recommendation> {
        let average_gap_days = self.average_gap_days(session_dates)?;
        if average_gap_days > self.config.sparse_gap_days {
            Some(Recommendation::TrainMoreOften { average_gap_days })
        } else if average_gap_days < self.config.dense_gap_days {
            Some(Recommendation::RecoverMore { average_gap_days })
        } else {
            None
        }
    }

    pub fn average_gap_days(&self, session_dates: &[DateTime<Utc>]) -> Option<f64> {
        let mut dates = session_dates.to_vec();
        dates.sort();
        let window = self.config.frequency_window.max(2);
        let recent = &dates[dates.len().saturating_sub(window)..];
        let (first, last) = (recent.first()?, recent.last()?);
        if recent.len() < 2 {
            return None;
        }
        let span = (*last - *first).num_seconds() as f64 / SECONDS_PER_DAY;
        Some(span / (recent.len() - 1) as f64)
    }
}

fn same_weight(a: f64, b: f64) -> bool {
    (a - b).abs() <= WEIGHT_TOLERANCE
}
