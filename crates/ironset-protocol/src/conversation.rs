//! Conversation states.
//!
//! The state is persisted on the user profile next to the current workout
//! session, so a restart of the daemon resumes where the user left off.

use serde::{Deserialize, Serialize};

/// Where a user currently is in the conversation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    /// No conversation in progress.
    #[default]
    Idle,
    /// Waiting for a training day label.
    ChoosingDay,
    /// A session is open; waiting for an exercise button or a session action.
    ChoosingExercise,
    /// Waiting for "weight reps" for the exercise at `exercise_index`.
    EnteringExerciseData { exercise_index: usize },
    /// Waiting for a body-weight value (or skip).
    Weighing,
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Index of the exercise whose data is being entered, if any.
    pub fn active_exercise(&self) -> Option<usize> {
        match self {
            Self::EnteringExerciseData { exercise_index } => Some(*exercise_index),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ChoosingDay => "choosing_day",
            Self::ChoosingExercise => "choosing_exercise",
            Self::EnteringExerciseData { .. } => "entering_exercise_data",
            Self::Weighing => "weighing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert!(ConversationState::default().is_idle());
    }

    #[test]
    fn entering_state_carries_exercise_index() {
        let state = ConversationState::EnteringExerciseData { exercise_index: 3 };
        assert_eq!(state.active_exercise(), Some(3));
        assert_eq!(ConversationState::ChoosingExercise.active_exercise(), None);
    }

    #[test]
    fn serializes_with_state_tag() {
        let state = ConversationState::EnteringExerciseData { exercise_index: 1 };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "state": "entering_exercise_data", "exercise_index": 1 })
        );
        let back: ConversationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
