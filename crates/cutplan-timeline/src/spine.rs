//! Chronological spine assembly.
//!
//! Elements are validated as they are added, sorted into the final
//! chronological order (ascending offset, ties broken by ascending lane —
//! lower lanes composite first in the target format), and partitioned into
//! the per-kind groups the output document stores.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cutplan_core::Span;

use crate::element::{ElementKind, SpineElement};
use crate::error::TimelineError;
use crate::validator::TimelineValidator;

/// The output document's per-kind element groups.
///
/// The target format keeps each kind in its own ordered collection; relative
/// order within a kind is preserved from the chronological sort because
/// editors are sensitive to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpineGroups {
    pub clips: Vec<SpineElement>,
    pub videos: Vec<SpineElement>,
    pub titles: Vec<SpineElement>,
    pub generators: Vec<SpineElement>,
    pub gaps: Vec<SpineElement>,
}

impl SpineGroups {
    pub fn len(&self) -> usize {
        self.clips.len()
            + self.videos.len()
            + self.titles.len()
            + self.generators.len()
            + self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements across groups, in group order.
    pub fn iter(&self) -> impl Iterator<Item = &SpineElement> {
        self.clips
            .iter()
            .chain(&self.videos)
            .chain(&self.titles)
            .chain(&self.generators)
            .chain(&self.gaps)
    }
}

/// Accumulates, validates, sorts, and partitions spine elements.
#[derive(Debug)]
pub struct SpineBuilder {
    validator: TimelineValidator,
    elements: Vec<SpineElement>,
}

impl SpineBuilder {
    pub fn new(total_duration: Span) -> Self {
        Self {
            validator: TimelineValidator::new(total_duration),
            elements: Vec::new(),
        }
    }

    /// Permit same-lane overlaps (off by default).
    pub fn permit_overlaps(&mut self) -> &mut Self {
        self.validator.allow_overlaps(true);
        self
    }

    /// Permit non-contiguous lane usage (off by default).
    pub fn permit_lane_gaps(&mut self) -> &mut Self {
        self.validator.allow_lane_gaps(true);
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Validate and accept one element.
    ///
    /// Runs the element's own shape checks, then the placement checks
    /// (bounds, lane, same-lane half-open overlap against every previously
    /// accepted element). On failure nothing is recorded.
    pub fn add_element(&mut self, element: SpineElement) -> Result<(), TimelineError> {
        element.validate_structure()?;
        self.validator.add_element(
            &element.name,
            element.offset,
            element.duration,
            element.lane.index(),
            element.kind().name(),
        )?;
        debug!(name = %element.name, kind = %element.kind(), "accepted spine element");
        self.elements.push(element);
        Ok(())
    }

    /// Produce the final ordering: ascending offset, ties broken by
    /// ascending lane. A post-sort pass asserts non-decreasing offsets.
    pub fn sort_and_validate(&self) -> Result<Vec<SpineElement>, TimelineError> {
        let mut sorted = self.elements.clone();
        sorted.sort_by(|a, b| {
            a.offset
                .cmp(&b.offset)
                .then_with(|| a.lane.cmp(&b.lane))
        });

        for pair in sorted.windows(2) {
            if pair[1].offset < pair[0].offset {
                return Err(TimelineError::Internal(format!(
                    "sort produced decreasing offsets: {:?} after {:?}",
                    pair[1].name, pair[0].name
                )));
            }
        }
        Ok(sorted)
    }

    /// Run the final gate and partition the sorted sequence into the output
    /// document's per-kind groups.
    pub fn build(self) -> Result<SpineGroups, TimelineError> {
        self.validator.validate_complete()?;
        let sorted = self.sort_and_validate()?;

        let mut groups = SpineGroups::default();
        for element in sorted {
            match element.kind() {
                ElementKind::Clip => groups.clips.push(element),
                ElementKind::Video => groups.videos.push(element),
                ElementKind::Title => groups.titles.push(element),
                ElementKind::Generator => groups.generators.push(element),
                ElementKind::Gap => groups.gaps.push(element),
            }
        }
        debug!(elements = groups.len(), "spine built");
        Ok(groups)
    }
}
