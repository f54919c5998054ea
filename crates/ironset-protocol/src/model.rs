//! Persisted data model: user profiles, workout sessions and records.

use crate::conversation::ConversationState;
use crate::ids::UserId;
use crate::input::SetInput;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The whole persisted document: user id → profile, in insertion order.
pub type UserDirectory = IndexMap<UserId, UserProfile>;

/// One recorded set for one exercise of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub weight: f64,
    pub reps: u32,
    pub timestamp: DateTime<Utc>,
}

/// One body-weight entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub weight: f64,
    pub timestamp: DateTime<Utc>,
}

/// A training-day attempt. Lives in `current_session` while open and is moved
/// into `history` when finished with at least one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub day: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<ExerciseRecord>,
    /// Indices into the day's exercise list.
    #[serde(default)]
    pub completed_exercises: BTreeSet<usize>,
}

impl WorkoutSession {
    pub fn new(day: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            day: day.into(),
            start_time,
            exercises: Vec::new(),
            completed_exercises: BTreeSet::new(),
        }
    }

    /// Stores a set for exercise `index` named `name`, replacing an earlier
    /// record with the same name, and marks the index completed.
    pub fn record_set(
        &mut self,
        index: usize,
        name: &str,
        set: SetInput,
        at: DateTime<Utc>,
    ) -> &ExerciseRecord {
        let record = ExerciseRecord {
            name: name.to_owned(),
            weight: set.weight,
            reps: set.reps,
            timestamp: at,
        };

        let position = match self.exercises.iter().position(|ex| ex.name == name) {
            Some(existing) => {
                self.exercises[existing] = record;
                existing
            }
            None => {
                self.exercises.push(record);
                self.exercises.len() - 1
            }
        };
        self.completed_exercises.insert(index);
        &self.exercises[position]
    }

    pub fn record(&self, name: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|ex| ex.name == name)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed_exercises.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// What happened to the current session on finish.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    NoSession,
    /// The session had no records and was dropped.
    Discarded(WorkoutSession),
    /// The session was appended to history.
    Archived(WorkoutSession),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub history: Vec<WorkoutSession>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weight_history: Vec<WeightRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_session: Option<WorkoutSession>,
    #[serde(default, skip_serializing_if = "ConversationState::is_idle")]
    pub conversation: ConversationState,
}

impl UserProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Opens a new session for `day`, returning the unfinished session it
    /// replaced, if any.
    pub fn begin_session(
        &mut self,
        day: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Option<WorkoutSession> {
        self.current_session.replace(WorkoutSession::new(day, at))
    }

    pub fn finish_session(&mut self) -> FinishOutcome {
        match self.current_session.take() {
            None => FinishOutcome::NoSession,
            Some(session) if session.is_empty() => FinishOutcome::Discarded(session),
            Some(session) => {
                self.history.push(session.clone());
                FinishOutcome::Archived(session)
            }
        }
    }

    pub fn cancel_session(&mut self) -> Option<WorkoutSession> {
        self.current_session.take()
    }

    pub fn record_body_weight(&mut self, weight: f64, at: DateTime<Utc>) {
        self.weight_history.push(WeightRecord {
            weight,
            timestamp: at,
        });
    }

    /// Archived records for `exercise`, most recent first, at most `limit`.
    pub fn recent_records(&self, exercise: &str, limit: usize) -> Vec<&ExerciseRecord> {
        self.history
            .iter()
            .rev()
            .filter_map(|session| session.record(exercise))
            .take(limit)
            .collect()
    }

    /// Start times of archived sessions in chronological order.
    pub fn session_dates(&self) -> Vec<DateTime<Utc>> {
        self.history.iter().map(|session| session.start_time).collect()
    }

    /// Heaviest archived weight for `exercise`.
    pub fn best_weight(&self, exercise: &str) -> Option<f64> {
        self.history
            .iter()
            .filter_map(|session| session.record(exercise))
            .map(|record| record.weight)
            .fold(None, |best, weight| match best {
                Some(current) if current >= weight => Some(current),
                _ => Some(weight),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn set(weight: f64, reps: u32) -> SetInput {
        SetInput { weight, reps }
    }

    #[test]
    fn record_set_overwrites_same_exercise() {
        let now = Utc::now();
        let mut session = WorkoutSession::new("Day A", now);
        session.record_set(0, "Leg press", set(100.0, 10), now);
        session.record_set(1, "Pull-ups", set(10.0, 8), now);
        session.record_set(0, "Leg press", set(110.0, 8), now);

        assert_eq!(session.exercises.len(), 2);
        let leg_press: Vec<_> = session
            .exercises
            .iter()
            .filter(|ex| ex.name == "Leg press")
            .collect();
        assert_eq!(leg_press.len(), 1);
        assert_eq!(leg_press[0].weight, 110.0);
        assert_eq!(leg_press[0].reps, 8);
        // overwrite keeps the original position
        assert_eq!(session.exercises[0].name, "Leg press");
        assert_eq!(session.completed_exercises.len(), 2);
    }

    #[test]
    fn finishing_empty_session_discards_it() {
        let mut profile = UserProfile::new("Alex");
        profile.begin_session("Day A", Utc::now());

        let outcome = profile.finish_session();
        assert!(matches!(outcome, FinishOutcome::Discarded(_)));
        assert!(profile.history.is_empty());
        assert!(profile.current_session.is_none());
    }

    #[test]
    fn finishing_non_empty_session_archives_once() {
        let now = Utc::now();
        let mut profile = UserProfile::new("Alex");
        profile.begin_session("Day A", now);
        if let Some(session) = profile.current_session.as_mut() {
            session.record_set(0, "Leg press", set(100.0, 10), now);
        }

        let outcome = profile.finish_session();
        assert!(matches!(outcome, FinishOutcome::Archived(_)));
        assert_eq!(profile.history.len(), 1);
        assert!(profile.current_session.is_none());
        assert_eq!(profile.finish_session(), FinishOutcome::NoSession);
        assert_eq!(profile.history.len(), 1);
    }

    #[test]
    fn begin_session_replaces_unfinished_one() {
        let now = Utc::now();
        let mut profile = UserProfile::new("Alex");
        profile.begin_session("Day A", now);
        let replaced = profile.begin_session("Day B", now);

        assert_eq!(replaced.map(|s| s.day), Some("Day A".to_owned()));
        assert_eq!(
            profile.current_session.as_ref().map(|s| s.day.as_str()),
            Some("Day B")
        );
        assert!(profile.history.is_empty());
    }

    #[test]
    fn recent_records_are_most_recent_first() {
        let start = Utc::now();
        let mut profile = UserProfile::new("Alex");
        for (offset, weight) in [60.0, 62.5, 65.0, 67.5].into_iter().enumerate() {
            let at = start + Duration::days(offset as i64 * 2);
            profile.begin_session("Day A", at);
            if let Some(session) = profile.current_session.as_mut() {
                session.record_set(2, "Bench press", set(weight, 8), at);
            }
            profile.finish_session();
        }

        let recent: Vec<f64> = profile
            .recent_records("Bench press", 3)
            .iter()
            .map(|r| r.weight)
            .collect();
        assert_eq!(recent, vec![67.5, 65.0, 62.5]);
        assert_eq!(profile.best_weight("Bench press"), Some(67.5));
        assert_eq!(profile.best_weight("Squat"), None);
        assert_eq!(profile.session_dates().len(), 4);
    }

    #[test]
    fn profile_json_uses_snake_case_and_skips_empty_optionals() {
        let profile = UserProfile::new("Alex");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json, serde_json::json!({ "username": "Alex", "history": [] }));

        let parsed: UserProfile =
            serde_json::from_str(r#"{"username":"Sam","history":[]}"#).unwrap();
        assert!(parsed.weight_history.is_empty());
        assert!(parsed.conversation.is_idle());
    }
}
