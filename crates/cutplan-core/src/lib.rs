//! Cutplan Core - Foundation types for timeline document construction
//!
//! This crate provides the fundamental value types used throughout Cutplan:
//! - Frame-aligned time representation (Moment, Span, TimeRange)
//! - Lane (layer) indices
//! - Resource identifiers
//! - Keyframe and animation-parameter validation
//!
//! All types validate at construction time, so a value that exists is a value
//! that is legal in the target document format.

pub mod error;
pub mod ident;
pub mod keyframe;
pub mod lane;
pub mod time;

pub use error::{KeyframeError, LaneError, TimeError};
pub use ident::ResourceId;
pub use keyframe::{
    validate_keyframe, validate_sequence, Curve, Interp, Keyframe, KeyframeSeries, KeyframeValue,
    ParamKind,
};
pub use lane::Lane;
pub use time::{Moment, Span, TimeRange, FRAME_SECONDS, FRAME_TICKS, TIMEBASE};
