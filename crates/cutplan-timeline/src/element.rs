//! Typed timeline elements.
//!
//! Every element the spine can carry is one closed enum of payloads, so each
//! validator matches exhaustively and a new kind cannot be added without
//! every consumer being updated.

use serde::{Deserialize, Serialize};
use std::fmt;

use cutplan_core::{Lane, Moment, ResourceId, Span, TimeRange};

use crate::error::TimelineError;

/// Element kinds, in the target format's group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Clip,
    Video,
    Title,
    Generator,
    Gap,
}

impl ElementKind {
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Clip => "clip",
            ElementKind::Video => "video",
            ElementKind::Title => "title",
            ElementKind::Generator => "generator",
            ElementKind::Gap => "gap",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a spine element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Clip {
        asset_ref: ResourceId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format_ref: Option<ResourceId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        connected: Vec<ConnectedElement>,
    },
    Video {
        asset_ref: ResourceId,
    },
    Title {
        effect_ref: ResourceId,
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        style_refs: Vec<String>,
    },
    Generator {
        effect_ref: ResourceId,
    },
    Gap,
}

impl Payload {
    pub fn kind(&self) -> ElementKind {
        match self {
            Payload::Clip { .. } => ElementKind::Clip,
            Payload::Video { .. } => ElementKind::Video,
            Payload::Title { .. } => ElementKind::Title,
            Payload::Generator { .. } => ElementKind::Generator,
            Payload::Gap => ElementKind::Gap,
        }
    }

    /// The resource this payload references, if any.
    pub fn reference(&self) -> Option<ResourceId> {
        match self {
            Payload::Clip { asset_ref, .. } | Payload::Video { asset_ref } => Some(*asset_ref),
            Payload::Title { effect_ref, .. } | Payload::Generator { effect_ref } => {
                Some(*effect_ref)
            }
            Payload::Gap => None,
        }
    }
}

/// An element nested inside a clip rather than placed on the spine.
///
/// Connected elements are timed in the parent clip's local space: offset zero
/// is the parent's start, and the element must fit within the parent's
/// duration. Their lanes are the connected lane space of that one parent,
/// independent of the parent's own spine lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedElement {
    pub name: String,
    /// Offset within the parent clip.
    pub offset: Moment,
    pub duration: Span,
    pub lane: Lane,
    pub payload: Payload,
}

impl ConnectedElement {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.offset, self.duration)
    }
}

/// A timeline element: placement plus kind-specific payload.
///
/// Elements are immutable after acceptance by the spine builder; there is
/// deliberately no removal or mutation API, which forces validation before
/// addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineElement {
    pub name: String,
    pub offset: Moment,
    pub duration: Span,
    pub lane: Lane,
    pub payload: Payload,
}

impl SpineElement {
    pub fn clip(
        name: impl Into<String>,
        offset: Moment,
        duration: Span,
        lane: Lane,
        asset_ref: ResourceId,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            duration,
            lane,
            payload: Payload::Clip {
                asset_ref,
                format_ref: None,
                connected: Vec::new(),
            },
        }
    }

    pub fn video(
        name: impl Into<String>,
        offset: Moment,
        duration: Span,
        lane: Lane,
        asset_ref: ResourceId,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            duration,
            lane,
            payload: Payload::Video { asset_ref },
        }
    }

    pub fn title(
        name: impl Into<String>,
        offset: Moment,
        duration: Span,
        lane: Lane,
        effect_ref: ResourceId,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            duration,
            lane,
            payload: Payload::Title {
                effect_ref,
                text: text.into(),
                style_refs: Vec::new(),
            },
        }
    }

    pub fn generator(
        name: impl Into<String>,
        offset: Moment,
        duration: Span,
        lane: Lane,
        effect_ref: ResourceId,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            duration,
            lane,
            payload: Payload::Generator { effect_ref },
        }
    }

    pub fn gap(offset: Moment, duration: Span, lane: Lane) -> Self {
        Self {
            name: "Gap".to_string(),
            offset,
            duration,
            lane,
            payload: Payload::Gap,
        }
    }

    /// Attach a format reference (clips only; no-op otherwise).
    pub fn with_format(mut self, format: ResourceId) -> Self {
        if let Payload::Clip { ref mut format_ref, .. } = self.payload {
            *format_ref = Some(format);
        }
        self
    }

    /// Attach text style references (titles only; no-op otherwise).
    pub fn with_style_refs(mut self, refs: Vec<String>) -> Self {
        if let Payload::Title { ref mut style_refs, .. } = self.payload {
            *style_refs = refs;
        }
        self
    }

    /// Attach a connected element (clips only; no-op otherwise).
    pub fn with_connected(mut self, element: ConnectedElement) -> Self {
        if let Payload::Clip { ref mut connected, .. } = self.payload {
            connected.push(element);
        }
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.payload.kind()
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.offset, self.duration)
    }

    /// The resource this element references, if any.
    pub fn reference(&self) -> Option<ResourceId> {
        self.payload.reference()
    }

    /// Per-element shape checks that do not need the rest of the timeline.
    ///
    /// Gaps may be zero length; everything else needs a strictly positive
    /// duration. Connected elements must fit inside the parent clip and may
    /// not overlap each other on the same connected lane; nesting below one
    /// level and connected gaps are rejected.
    pub fn validate_structure(&self) -> Result<(), TimelineError> {
        if self.duration.is_zero() && self.kind() != ElementKind::Gap {
            return Err(TimelineError::NonPositiveDuration {
                element: self.name.clone(),
                kind: self.kind().to_string(),
            });
        }

        if let Payload::Clip { connected, .. } = &self.payload {
            let parent_range = TimeRange::new(Moment::ZERO, self.duration);
            for (index, child) in connected.iter().enumerate() {
                match &child.payload {
                    Payload::Gap => {
                        return Err(TimelineError::InvalidConnectedElement {
                            element: child.name.clone(),
                            reason: "a gap cannot be a connected element",
                        });
                    }
                    Payload::Clip { connected: nested, .. } if !nested.is_empty() => {
                        return Err(TimelineError::InvalidConnectedElement {
                            element: child.name.clone(),
                            reason: "connected elements cannot nest further",
                        });
                    }
                    _ => {}
                }

                if child.duration.is_zero() {
                    return Err(TimelineError::NonPositiveDuration {
                        element: child.name.clone(),
                        kind: child.payload.kind().to_string(),
                    });
                }
                if child.range().end() > parent_range.end() {
                    return Err(TimelineError::ExceedsTimelineBounds {
                        element: child.name.clone(),
                        end: child.range().end(),
                        total: self.duration,
                    });
                }
                for earlier in &connected[..index] {
                    if earlier.lane == child.lane && earlier.range().overlaps(child.range()) {
                        return Err(TimelineError::Overlap {
                            element: child.name.clone(),
                            with: earlier.name.clone(),
                            lane: child.lane,
                            range: child.range(),
                            with_range: earlier.range(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
