//! Shared document resources: media assets, formats, and effects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use cutplan_core::{ResourceId, Span};

use crate::error::ResourceError;

/// The kind of media behind an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        })
    }
}

/// Whether a format describes moving or still images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Video,
    Image,
}

/// A registered document resource.
///
/// Resources are owned exclusively by the [`Registry`]; timeline elements
/// hold [`ResourceId`] references, never copies.
///
/// [`Registry`]: crate::registry::Registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    /// A media file on disk.
    Asset {
        id: ResourceId,
        name: String,
        source_path: String,
        /// Stable media UID, carried through re-exports.
        uid: Uuid,
        media_kind: MediaKind,
        /// Exactly zero for image media, strictly positive otherwise.
        duration: Span,
    },
    /// Pixel dimensions plus an optional frame duration.
    Format {
        id: ResourceId,
        name: String,
        width: u32,
        height: u32,
        kind: FormatKind,
        /// Forbidden for image formats, required and nonzero otherwise.
        frame_duration: Option<Span>,
    },
    /// A title/generator effect identified by a stable vendor UID.
    Effect {
        id: ResourceId,
        name: String,
        effect_uid: String,
    },
}

impl Resource {
    pub fn asset(
        id: ResourceId,
        name: impl Into<String>,
        source_path: impl Into<String>,
        media_kind: MediaKind,
        duration: Span,
    ) -> Self {
        Resource::Asset {
            id,
            name: name.into(),
            source_path: source_path.into(),
            uid: Uuid::new_v4(),
            media_kind,
            duration,
        }
    }

    pub fn format(
        id: ResourceId,
        name: impl Into<String>,
        width: u32,
        height: u32,
        kind: FormatKind,
        frame_duration: Option<Span>,
    ) -> Self {
        Resource::Format {
            id,
            name: name.into(),
            width,
            height,
            kind,
            frame_duration,
        }
    }

    pub fn effect(id: ResourceId, name: impl Into<String>, effect_uid: impl Into<String>) -> Self {
        Resource::Effect {
            id,
            name: name.into(),
            effect_uid: effect_uid.into(),
        }
    }

    /// Replace the generated media UID (assets only; no-op otherwise).
    pub fn with_uid(mut self, new_uid: Uuid) -> Self {
        if let Resource::Asset { ref mut uid, .. } = self {
            *uid = new_uid;
        }
        self
    }

    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Asset { id, .. }
            | Resource::Format { id, .. }
            | Resource::Effect { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::Asset { name, .. }
            | Resource::Format { name, .. }
            | Resource::Effect { name, .. } => name,
        }
    }

    /// Source path, for assets.
    pub fn source_path(&self) -> Option<&str> {
        match self {
            Resource::Asset { source_path, .. } => Some(source_path),
            _ => None,
        }
    }

    /// Check the kind-specific structural invariants.
    pub fn validate(&self) -> Result<(), ResourceError> {
        match self {
            Resource::Asset {
                name,
                source_path,
                media_kind,
                duration,
                ..
            } => {
                if source_path.is_empty() {
                    return Err(ResourceError::MissingRequiredField {
                        resource: name.clone(),
                        field: "src",
                    });
                }
                match media_kind {
                    MediaKind::Image => {
                        if !duration.is_zero() {
                            return Err(ResourceError::ForbiddenFieldForMediaKind {
                                resource: name.clone(),
                                field: "duration",
                                kind: *media_kind,
                            });
                        }
                    }
                    MediaKind::Video | MediaKind::Audio => {
                        if duration.is_zero() {
                            return Err(ResourceError::MissingRequiredField {
                                resource: name.clone(),
                                field: "duration",
                            });
                        }
                    }
                }
                Ok(())
            }
            Resource::Format {
                name,
                width,
                height,
                kind,
                frame_duration,
                ..
            } => {
                if *width == 0 || *height == 0 {
                    return Err(ResourceError::MissingRequiredField {
                        resource: name.clone(),
                        field: "width/height",
                    });
                }
                match kind {
                    FormatKind::Image => {
                        if frame_duration.is_some() {
                            return Err(ResourceError::ForbiddenFieldForMediaKind {
                                resource: name.clone(),
                                field: "frameDuration",
                                kind: MediaKind::Image,
                            });
                        }
                    }
                    FormatKind::Video => match frame_duration {
                        Some(d) if !d.is_zero() => {}
                        _ => {
                            return Err(ResourceError::MissingRequiredField {
                                resource: name.clone(),
                                field: "frameDuration",
                            });
                        }
                    },
                }
                Ok(())
            }
            Resource::Effect {
                name, effect_uid, ..
            } => {
                if effect_uid.is_empty() {
                    return Err(ResourceError::MissingRequiredField {
                        resource: name.clone(),
                        field: "uid",
                    });
                }
                Ok(())
            }
        }
    }
}
