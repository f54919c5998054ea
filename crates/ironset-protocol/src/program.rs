//! Training program reference data.
//!
//! A program is configuration, never user data: it is built in or loaded once
//! at startup and stays immutable for the life of the process.

use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One training day: a label and its fixed exercise list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgram {
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub exercises: Vec<String>,
}

impl DayProgram {
    pub fn exercise(&self, index: usize) -> TrackerResult<&str> {
        self.exercises
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| TrackerError::ExerciseOutOfRange {
                day: self.label.clone(),
                index,
                len: self.exercises.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub days: Vec<DayProgram>,
}

impl TrainingProgram {
    /// Parses and validates a program from JSON.
    pub fn from_json_str(raw: &str) -> TrackerResult<Self> {
        let program: Self =
            serde_json::from_str(raw).map_err(|e| TrackerError::Serialization(e.to_string()))?;
        program.validate()?;
        Ok(program)
    }

    /// Day labels must be unique (case-insensitively), and every day needs at
    /// least one exercise with no duplicate names.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.days.is_empty() {
            return Err(TrackerError::InvalidProgram("no training days".to_owned()));
        }

        let mut labels = HashSet::new();
        for day in &self.days {
            if day.label.trim().is_empty() {
                return Err(TrackerError::InvalidProgram("empty day label".to_owned()));
            }
            if !labels.insert(day.label.trim().to_lowercase()) {
                return Err(TrackerError::InvalidProgram(format!(
                    "duplicate day label: {}",
                    day.label
                )));
            }
            if day.is_empty() {
                return Err(TrackerError::InvalidProgram(format!(
                    "day {} has no exercises",
                    day.label
                )));
            }
            let mut names = HashSet::new();
            for exercise in &day.exercises {
                if !names.insert(exercise.as_str()) {
                    return Err(TrackerError::InvalidProgram(format!(
                        "duplicate exercise in {}: {exercise}",
                        day.label
                    )));
                }
            }
        }
        Ok(())
    }

    /// Exact label lookup, used for stored sessions.
    pub fn day(&self, label: &str) -> Option<&DayProgram> {
        self.days.iter().find(|day| day.label == label)
    }

    /// Lenient lookup for user-typed labels: trimmed, case-insensitive.
    pub fn resolve_day(&self, input: &str) -> Option<&DayProgram> {
        let wanted = input.trim().to_lowercase();
        self.days
            .iter()
            .find(|day| day.label.to_lowercase() == wanted)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|day| day.label.as_str())
    }
}

impl Default for TrainingProgram {
    /// Full-body split, three sessions a week alternating A and B.
    fn default() -> Self {
        Self {
            days: vec![
                DayProgram {
                    label: "Day A".to_owned(),
                    description: "Horizontal presses and vertical pulls".to_owned(),
                    exercises: [
                        "Leg press (4x8-12)",
                        "Wide-grip pull-ups (3xAMRAP)",
                        "Flat barbell bench press (4x6-10)",
                        "Seated dumbbell press (3x8-12)",
                        "Barbell curl (3x10-12)",
                        "Rope triceps pushdown (3x12-15)",
                        "Hanging leg raise (3x12-15)",
                    ]
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                },
                DayProgram {
                    label: "Day B".to_owned(),
                    description: "Vertical presses and horizontal rows".to_owned(),
                    exercises: [
                        "Romanian deadlift (4x10-12)",
                        "Barbell bent-over row (4x8-12)",
                        "Incline dumbbell press 30° (4x10-12)",
                        "Wide-grip upright row (3x10-15)",
                        "Seated dumbbell curl (3x10-12)",
                        "EZ-bar skull crusher (3x10-12)",
                        "Roman chair crunch (3x15-20)",
                    ]
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                },
            ],
        }
    }
}
