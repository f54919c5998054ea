//! Free-text input parsing: "weight reps" sets and body-weight entries.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Upper bound accepted for a body-weight entry.
pub const MAX_BODY_WEIGHT: f64 = 300.0;

/// One parsed set: weight × reps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetInput {
    pub weight: f64,
    pub reps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetInputError {
    #[error("expected two numbers, got {0} value(s)")]
    TokenCount(usize),
    #[error("weight is not a number: {0}")]
    Weight(String),
    #[error("reps is not a whole number: {0}")]
    Reps(String),
    #[error("numbers must be positive")]
    NotPositive,
}

impl FromStr for SetInput {
    type Err = SetInputError;

    /// Parses exactly two whitespace-separated tokens. The weight accepts a
    /// comma as decimal separator; both values must be strictly positive.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [weight_raw, reps_raw] = tokens.as_slice() else {
            return Err(SetInputError::TokenCount(tokens.len()));
        };

        let weight = parse_decimal(weight_raw)
            .ok_or_else(|| SetInputError::Weight((*weight_raw).to_owned()))?;
        let reps: i64 = reps_raw
            .parse()
            .map_err(|_| SetInputError::Reps((*reps_raw).to_owned()))?;

        if weight <= 0.0 || reps <= 0 {
            return Err(SetInputError::NotPositive);
        }
        let reps = u32::try_from(reps).map_err(|_| SetInputError::Reps((*reps_raw).to_owned()))?;

        Ok(Self { weight, reps })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyWeightError {
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("{0} is outside the accepted range (0, 300]")]
    OutOfRange(f64),
}

/// Parses a single body-weight value in `(0, MAX_BODY_WEIGHT]`.
pub fn parse_body_weight(text: &str) -> Result<f64, BodyWeightError> {
    let trimmed = text.trim();
    let weight =
        parse_decimal(trimmed).ok_or_else(|| BodyWeightError::NotANumber(trimmed.to_owned()))?;
    if weight <= 0.0 || weight > MAX_BODY_WEIGHT {
        return Err(BodyWeightError::OutOfRange(weight));
    }
    Ok(weight)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
