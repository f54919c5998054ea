//! Error types for the workout tracker.

use crate::input::{BodyWeightError, SetInputError};
use thiserror::Error;

/// Errors that can occur in tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("unknown training day: {0}")]
    UnknownDay(String),
    #[error("exercise index {index} out of range for {day} ({len} exercises)")]
    ExerciseOutOfRange {
        day: String,
        index: usize,
        len: usize,
    },
    #[error("no active workout session")]
    NoActiveSession,
    #[error("invalid set input: {0}")]
    InvalidSet(#[from] SetInputError),
    #[error("invalid body weight: {0}")]
    InvalidBodyWeight(#[from] BodyWeightError),
    #[error("invalid training program: {0}")]
    InvalidProgram(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
