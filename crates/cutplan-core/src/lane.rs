//! Lane (layer) indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LaneError;

/// A signed layer index on the timeline.
///
/// Lane 0 is the primary storyline and is never written as an attribute.
/// Positive lanes composite above the primary storyline; negative lanes
/// conventionally carry audio. A lane is assigned once when an element is
/// placed and is immutable afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Lane(i32);

impl Lane {
    pub const MIN: i32 = -10;
    pub const MAX: i32 = 10;

    /// The primary storyline.
    pub const PRIMARY: Self = Self(0);

    /// Construct a lane, rejecting indices outside `[-10, 10]`.
    pub fn new(lane: i32) -> Result<Self, LaneError> {
        if (Self::MIN..=Self::MAX).contains(&lane) {
            Ok(Self(lane))
        } else {
            Err(LaneError::OutOfRange {
                lane,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    #[inline]
    pub fn index(self) -> i32 {
        self.0
    }

    /// Whether this is the primary storyline (lane 0).
    #[inline]
    pub fn is_primary(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i32> for Lane {
    type Error = LaneError;
    fn try_from(lane: i32) -> Result<Self, Self::Error> {
        Self::new(lane)
    }
}

impl From<Lane> for i32 {
    fn from(lane: Lane) -> i32 {
        lane.0
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bounds() {
        assert!(Lane::new(0).is_ok());
        assert!(Lane::new(10).is_ok());
        assert!(Lane::new(-10).is_ok());
        assert_eq!(
            Lane::new(11),
            Err(LaneError::OutOfRange {
                lane: 11,
                min: -10,
                max: 10
            })
        );
        assert!(Lane::new(-11).is_err());
    }

    #[test]
    fn test_primary_lane() {
        assert!(Lane::PRIMARY.is_primary());
        assert!(!Lane::new(1).unwrap().is_primary());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Lane>("3").is_ok());
        assert!(serde_json::from_str::<Lane>("42").is_err());
    }
}
