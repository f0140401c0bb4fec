//! Error types for cutplan-core.

use thiserror::Error;

use crate::keyframe::ParamKind;
use crate::time::Moment;

/// Failures when validating or parsing a textual time value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("malformed rational time: {0:?}")]
    MalformedRational(String),

    #[error("time value {numerator}/24000s is not frame aligned (numerator must be a multiple of 1001)")]
    NotFrameAligned { numerator: i64 },

    #[error("wrong timebase: denominator {denominator} (expected 24000)")]
    WrongTimebase { denominator: i64 },
}

/// Failure when constructing a lane outside the permitted range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneError {
    #[error("lane {lane} out of range [{min}, {max}]")]
    OutOfRange { lane: i32, min: i32, max: i32 },
}

/// Failures when validating keyframes against the per-parameter rule table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyframeError {
    #[error("attribute {attribute:?} not allowed on {param} keyframes")]
    AttributeNotAllowed {
        param: ParamKind,
        attribute: &'static str,
    },

    #[error("invalid value shape for {param} keyframe: expected {expected}")]
    InvalidValueShape {
        param: ParamKind,
        expected: &'static str,
    },

    #[error("value {value} out of range for {param} keyframe (allowed: {range})")]
    ValueOutOfRange {
        param: ParamKind,
        value: f64,
        range: &'static str,
    },

    #[error("keyframe {index} at {time} precedes previous keyframe at {previous}")]
    NotChronological {
        index: usize,
        time: Moment,
        previous: Moment,
    },

    #[error("keyframe sequence is empty")]
    EmptySequence,
}
