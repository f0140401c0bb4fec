//! Error types for cutplan-timeline.

use thiserror::Error;

use cutplan_core::{KeyframeError, Lane, LaneError, Moment, ResourceId, Span, TimeError, TimeRange};

use crate::resource::MediaKind;

/// Failures when placing or validating timeline elements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error(transparent)]
    LaneOutOfRange(#[from] LaneError),

    #[error("element {element:?} ends at {end} which exceeds the timeline duration {total}")]
    ExceedsTimelineBounds {
        element: String,
        end: Moment,
        total: Span,
    },

    #[error("element {element:?} ({kind}) has non-positive duration; only gaps may be zero length")]
    NonPositiveDuration { element: String, kind: String },

    #[error(
        "element {element:?} at {range} overlaps {with:?} at {with_range} on lane {lane}"
    )]
    Overlap {
        element: String,
        with: String,
        lane: Lane,
        range: TimeRange,
        with_range: TimeRange,
    },

    #[error("lane {missing} is unused but lanes {min}..={max} are occupied; used lanes must be contiguous")]
    LaneGap { missing: i32, min: i32, max: i32 },

    #[error("connected element {element:?} is invalid: {reason}")]
    InvalidConnectedElement {
        element: String,
        reason: &'static str,
    },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Failures when creating, staging, or registering resources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("identifier {id} is already registered")]
    DuplicateIdentifier { id: ResourceId },

    #[error("resource {resource:?} is missing required field {field:?}")]
    MissingRequiredField {
        resource: String,
        field: &'static str,
    },

    #[error("field {field:?} is forbidden on {resource:?} for {kind} media")]
    ForbiddenFieldForMediaKind {
        resource: String,
        field: &'static str,
        kind: MediaKind,
    },

    #[error("transaction is already {state}; no further operations permitted")]
    TransactionClosed { state: &'static str },
}

/// Failures surfaced by whole-document validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("element {element:?} references {reference:?} which is not registered")]
    DanglingReference { element: String, reference: String },

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("animation on {element:?}: {source}")]
    Keyframe {
        element: String,
        source: KeyframeError,
    },
}
