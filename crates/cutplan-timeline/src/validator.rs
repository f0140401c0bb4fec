//! Placement validation for timeline elements.
//!
//! Tracks every placed element's offset, duration, lane, and kind against the
//! total document duration, and enforces the placement rules that are known
//! to crash or confuse the consuming editor: out-of-range lanes, elements
//! past the timeline end, zero-length non-gaps, same-lane overlaps, and
//! non-contiguous lane usage.

use serde::Serialize;
use std::collections::BTreeMap;

use cutplan_core::{Lane, Moment, Span, TimeError, TimeRange};

use crate::error::TimelineError;

/// A placed element as the validator sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedElement {
    pub id: String,
    pub range: TimeRange,
    pub lane: Lane,
    pub kind: String,
}

impl PlacedElement {
    pub fn end(&self) -> Moment {
        self.range.end()
    }
}

/// Aggregate placement statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStats {
    pub element_count: usize,
    /// Elements per lane index.
    pub lane_counts: BTreeMap<i32, usize>,
    /// Latest element end, i.e. the span actually covered.
    pub covered: Span,
    pub total: Span,
}

/// Validates element placement against a fixed total duration.
#[derive(Debug)]
pub struct TimelineValidator {
    total: Span,
    elements: Vec<PlacedElement>,
    check_overlaps: bool,
    check_lane_gaps: bool,
}

impl TimelineValidator {
    /// Overlap and lane-gap checking are both on by default.
    pub fn new(total_duration: Span) -> Self {
        Self {
            total: total_duration,
            elements: Vec::new(),
            check_overlaps: true,
            check_lane_gaps: true,
        }
    }

    /// Construct from an externally-supplied textual duration.
    pub fn from_text(total_duration: &str) -> Result<Self, TimeError> {
        Ok(Self::new(Span::parse(total_duration)?))
    }

    /// Permit same-lane overlaps (off by default).
    pub fn allow_overlaps(&mut self, allow: bool) -> &mut Self {
        self.check_overlaps = !allow;
        self
    }

    /// Permit non-contiguous lane usage (off by default).
    pub fn allow_lane_gaps(&mut self, allow: bool) -> &mut Self {
        self.check_lane_gaps = !allow;
        self
    }

    pub fn total_duration(&self) -> Span {
        self.total
    }

    /// Validate and record one element.
    ///
    /// Checks, in order: lane bounds, non-positive duration (gaps exempt),
    /// timeline bounds, and same-lane overlap (half-open intervals — touching
    /// endpoints never overlap).
    pub fn add_element(
        &mut self,
        id: &str,
        offset: Moment,
        duration: Span,
        lane: i32,
        kind: &str,
    ) -> Result<(), TimelineError> {
        let lane = Lane::new(lane)?;

        if duration.is_zero() && kind != "gap" {
            return Err(TimelineError::NonPositiveDuration {
                element: id.to_string(),
                kind: kind.to_string(),
            });
        }

        let range = TimeRange::new(offset, duration);
        if range.end() > Moment::ZERO + self.total {
            return Err(TimelineError::ExceedsTimelineBounds {
                element: id.to_string(),
                end: range.end(),
                total: self.total,
            });
        }

        if self.check_overlaps {
            if let Some(existing) = self
                .elements
                .iter()
                .find(|e| e.lane == lane && e.range.overlaps(range))
            {
                return Err(TimelineError::Overlap {
                    element: id.to_string(),
                    with: existing.id.clone(),
                    lane,
                    range,
                    with_range: existing.range,
                });
            }
        }

        self.elements.push(PlacedElement {
            id: id.to_string(),
            range,
            lane,
            kind: kind.to_string(),
        });
        Ok(())
    }

    /// Check that used lanes are contiguous from lowest to highest.
    ///
    /// Lanes {1, 3} with no lane 2 are rejected: non-contiguous lanes make
    /// connected-clip resolution ambiguous in the target format.
    pub fn validate_lane_structure(&self) -> Result<(), TimelineError> {
        if !self.check_lane_gaps || self.elements.is_empty() {
            return Ok(());
        }
        let used: Vec<i32> = {
            let mut lanes: Vec<i32> = self.elements.iter().map(|e| e.lane.index()).collect();
            lanes.sort_unstable();
            lanes.dedup();
            lanes
        };
        let min = used[0];
        let max = used[used.len() - 1];
        for lane in min..=max {
            if !used.contains(&lane) {
                return Err(TimelineError::LaneGap { missing: lane, min, max });
            }
        }
        Ok(())
    }

    /// All elements whose interval intersects the query window.
    pub fn get_elements_in_range(&self, start: Moment, duration: Span) -> Vec<&PlacedElement> {
        let window = TimeRange::new(start, duration);
        self.elements
            .iter()
            .filter(|e| e.range.overlaps(window))
            .collect()
    }

    pub fn elements(&self) -> &[PlacedElement] {
        &self.elements
    }

    /// Aggregate statistics over the recorded placements.
    pub fn stats(&self) -> TimelineStats {
        let mut lane_counts = BTreeMap::new();
        let mut covered = Moment::ZERO;
        for element in &self.elements {
            *lane_counts.entry(element.lane.index()).or_insert(0) += 1;
            if element.end() > covered {
                covered = element.end();
            }
        }
        TimelineStats {
            element_count: self.elements.len(),
            lane_counts,
            covered: Span::from_frames(covered.frames()),
            total: self.total,
        }
    }

    /// Final gate: re-run bounds and lane-structure checks over everything.
    pub fn validate_complete(&self) -> Result<(), TimelineError> {
        let end_limit = Moment::ZERO + self.total;
        for element in &self.elements {
            if element.end() > end_limit {
                return Err(TimelineError::ExceedsTimelineBounds {
                    element: element.id.clone(),
                    end: element.end(),
                    total: self.total,
                });
            }
        }
        self.validate_lane_structure()
    }
}
