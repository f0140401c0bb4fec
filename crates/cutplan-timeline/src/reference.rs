//! Cross-reference validation.
//!
//! Walks a fully assembled document and confirms every reference — clip and
//! video asset refs, title and generator effect refs, text style refs —
//! resolves against the registry or the document's style-definition set.

use cutplan_core::ResourceId;

use crate::document::Document;
use crate::element::{Payload, SpineElement};
use crate::error::DocumentError;
use crate::registry::Registry;

/// A single unresolved reference, for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Dangling {
    pub element: String,
    pub reference: String,
}

impl From<Dangling> for DocumentError {
    fn from(d: Dangling) -> Self {
        DocumentError::DanglingReference {
            element: d.element,
            reference: d.reference,
        }
    }
}

fn check_resource(
    element: &str,
    id: ResourceId,
    registry: &Registry,
    misses: &mut Vec<Dangling>,
) {
    if !registry.contains(id) {
        misses.push(Dangling {
            element: element.to_string(),
            reference: id.to_string(),
        });
    }
}

fn check_style_refs(
    element: &str,
    style_refs: &[String],
    document: &Document,
    misses: &mut Vec<Dangling>,
) {
    for style in style_refs {
        if !document.style_defs.contains(style) {
            misses.push(Dangling {
                element: element.to_string(),
                reference: style.clone(),
            });
        }
    }
}

fn walk_payload(
    element_name: &str,
    payload: &Payload,
    document: &Document,
    registry: &Registry,
    misses: &mut Vec<Dangling>,
) {
    match payload {
        Payload::Clip {
            asset_ref,
            format_ref,
            connected,
        } => {
            check_resource(element_name, *asset_ref, registry, misses);
            if let Some(format) = format_ref {
                check_resource(element_name, *format, registry, misses);
            }
            for child in connected {
                walk_payload(&child.name, &child.payload, document, registry, misses);
            }
        }
        Payload::Video { asset_ref } => {
            check_resource(element_name, *asset_ref, registry, misses);
        }
        Payload::Title {
            effect_ref,
            style_refs,
            ..
        } => {
            check_resource(element_name, *effect_ref, registry, misses);
            check_style_refs(element_name, style_refs, document, misses);
        }
        Payload::Generator { effect_ref } => {
            check_resource(element_name, *effect_ref, registry, misses);
        }
        Payload::Gap => {}
    }
}

fn walk_element(
    element: &SpineElement,
    document: &Document,
    registry: &Registry,
    misses: &mut Vec<Dangling>,
) {
    walk_payload(&element.name, &element.payload, document, registry, misses);
}

/// Collect every dangling reference in the document.
pub fn collect_dangling(document: &Document, registry: &Registry) -> Vec<Dangling> {
    let mut misses = Vec::new();
    for element in document.spine.iter() {
        walk_element(element, document, registry, &mut misses);
    }
    misses
}

/// Fail-fast reference check: error on the first dangling reference.
pub fn validate_references(document: &Document, registry: &Registry) -> Result<(), DocumentError> {
    match collect_dangling(document, registry).into_iter().next() {
        Some(miss) => Err(miss.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SpineElement;
    use crate::resource::{MediaKind, Resource};
    use crate::spine::SpineGroups;
    use cutplan_core::{Lane, Moment, Span};

    fn rid(n: u32) -> ResourceId {
        ResourceId::new(n).unwrap()
    }

    fn document_with(groups: SpineGroups) -> Document {
        Document {
            name: "Test".to_string(),
            total_duration: Span::from_frames(1000),
            spine: groups,
            style_defs: ["ts1".to_string()].into_iter().collect(),
            animations: Vec::new(),
        }
    }

    fn registry_with_asset() -> Registry {
        let mut registry = Registry::new();
        let id = registry.reserve_ids(1)[0];
        registry
            .register(Resource::asset(
                id,
                "A",
                "media/a.mov",
                MediaKind::Video,
                Span::from_frames(240),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_resolved_reference_passes() {
        let registry = registry_with_asset();
        let mut groups = SpineGroups::default();
        groups.clips.push(SpineElement::clip(
            "C",
            Moment::ZERO,
            Span::from_frames(240),
            Lane::PRIMARY,
            rid(1),
        ));
        let document = document_with(groups);
        assert!(validate_references(&document, &registry).is_ok());
    }

    #[test]
    fn test_dangling_asset_reference() {
        let registry = registry_with_asset();
        let mut groups = SpineGroups::default();
        groups.clips.push(SpineElement::clip(
            "C",
            Moment::ZERO,
            Span::from_frames(240),
            Lane::PRIMARY,
            rid(99),
        ));
        let document = document_with(groups);
        assert_eq!(
            validate_references(&document, &registry),
            Err(DocumentError::DanglingReference {
                element: "C".to_string(),
                reference: "r99".to_string(),
            })
        );
    }

    #[test]
    fn test_dangling_style_reference() {
        let mut registry = registry_with_asset();
        let effect = registry.reserve_ids(1)[0];
        registry
            .register(Resource::effect(effect, "Basic Title", "uid-1"))
            .unwrap();

        let mut groups = SpineGroups::default();
        groups.titles.push(
            SpineElement::title(
                "T",
                Moment::ZERO,
                Span::from_frames(100),
                Lane::PRIMARY,
                effect,
                "Hello",
            )
            .with_style_refs(vec!["ts1".to_string(), "ts9".to_string()]),
        );
        let document = document_with(groups);
        assert_eq!(
            validate_references(&document, &registry),
            Err(DocumentError::DanglingReference {
                element: "T".to_string(),
                reference: "ts9".to_string(),
            })
        );
    }

    #[test]
    fn test_summary_collects_every_miss() {
        let registry = Registry::new();
        let mut groups = SpineGroups::default();
        groups.clips.push(SpineElement::clip(
            "C1",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::PRIMARY,
            rid(5),
        ));
        groups.videos.push(SpineElement::video(
            "V1",
            Moment::from_frames(100),
            Span::from_frames(100),
            Lane::PRIMARY,
            rid(6),
        ));
        let document = document_with(groups);
        let misses = collect_dangling(&document, &registry);
        assert_eq!(misses.len(), 2);
    }

    #[test]
    fn test_connected_references_are_walked() {
        let registry = registry_with_asset();
        let child = crate::element::ConnectedElement {
            name: "Inner".to_string(),
            offset: Moment::ZERO,
            duration: Span::from_frames(50),
            lane: Lane::new(1).unwrap(),
            payload: Payload::Title {
                effect_ref: rid(42),
                text: "Nested".to_string(),
                style_refs: Vec::new(),
            },
        };
        let mut groups = SpineGroups::default();
        groups.clips.push(
            SpineElement::clip(
                "C",
                Moment::ZERO,
                Span::from_frames(240),
                Lane::PRIMARY,
                rid(1),
            )
            .with_connected(child),
        );
        let document = document_with(groups);
        let misses = collect_dangling(&document, &registry);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].element, "Inner");
        assert_eq!(misses[0].reference, "r42");
    }
}
