//! # ironset-protocol — Workout Tracker Contract
//!
//! This crate defines the data model, conversation states, inbound actions,
//! outbound replies and port traits shared by every ironset crate.
//!
//! It is intentionally dependency-light (no tokio, no chat framework) so the
//! store, coach, renderer and engine can all depend on it as a pure contract.
//!
//! ## Module Overview
//!
//! - [`ids`] — Typed ID wrappers (UserId, ChatId)
//! - [`model`] — UserProfile, WorkoutSession, ExerciseRecord, WeightRecord
//! - [`program`] — TrainingProgram / DayProgram reference data
//! - [`conversation`] — ConversationState (persisted per user)
//! - [`input`] — "weight reps" and body-weight text parsing
//! - [`action`] — Inbound commands, button actions and text
//! - [`reply`] — Outbound reply text and keyboard layouts
//! - [`ports`] — Store and notifier boundaries
//! - [`error`] — TrackerError, TrackerResult

pub mod action;
pub mod conversation;
pub mod error;
pub mod ids;
pub mod input;
pub mod model;
pub mod ports;
pub mod program;
pub mod reply;

// Re-export the most commonly used types at the crate root.
pub use action::{ButtonAction, Command, Inbound, InboundEvent, Sender};
pub use conversation::ConversationState;
pub use error::{TrackerError, TrackerResult};
pub use ids::{ChatId, UserId};
pub use input::{BodyWeightError, MAX_BODY_WEIGHT, SetInput, SetInputError, parse_body_weight};
pub use model::{
    ExerciseRecord, FinishOutcome, UserDirectory, UserProfile, WeightRecord, WorkoutSession,
};
pub use ports::{NotifierPort, UserStorePort};
pub use program::{DayProgram, TrainingProgram};
pub use reply::{Button, Keyboard, Reply};
