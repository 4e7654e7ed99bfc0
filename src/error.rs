//! Error types
//!
//! Validation errors are surfaced to callers. Explanation errors never leave
//! the matcher: they are logged and replaced by the fallback sentence.

use thiserror::Error;

/// Invalid birth input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("birth year {year} is outside the supported range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("{year:04}-{month:02}-{day:02} is not a valid calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("birth hour {0} is outside 0-23")]
    InvalidHour(u8),
}

/// Failure of a single explanation-generation call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplanationError {
    #[error("explanation request timed out after {0} ms")]
    Timeout(u128),

    #[error("{provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("{0} returned an empty explanation")]
    EmptyResponse(String),

    #[error("all explanation providers failed: {}", .0.join("; "))]
    AllProvidersFailed(Vec<String>),
}

/// Unrecognised element or animal name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}
