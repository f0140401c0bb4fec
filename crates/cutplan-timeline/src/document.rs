//! Whole-document validation.
//!
//! The orchestrator is the seam the serialization layer calls: it re-runs
//! every check over an assembled document and either passes it through
//! untouched or returns the first failure. Nothing half-valid is ever exposed
//! to the caller. A summary mode continues past failures and produces a
//! complete report for diagnostics.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use cutplan_core::{validate_sequence, Keyframe, ParamKind, Span};

use crate::error::DocumentError;
use crate::reference::{collect_dangling, validate_references};
use crate::registry::Registry;
use crate::spine::SpineGroups;
use crate::validator::TimelineValidator;

/// An animated parameter attached to a named element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimatedParam {
    pub element: String,
    pub kind: ParamKind,
    pub keyframes: Vec<Keyframe>,
}

/// A fully assembled timeline document, ready for final validation and
/// serialization.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub name: String,
    pub total_duration: Span,
    pub spine: SpineGroups,
    /// Text style definition names the document declares.
    pub style_defs: BTreeSet<String>,
    pub animations: Vec<AnimatedParam>,
}

impl Document {
    pub fn new(name: impl Into<String>, total_duration: Span, spine: SpineGroups) -> Self {
        Self {
            name: name.into(),
            total_duration,
            spine,
            style_defs: BTreeSet::new(),
            animations: Vec::new(),
        }
    }

    pub fn define_style(&mut self, name: impl Into<String>) {
        self.style_defs.insert(name.into());
    }

    pub fn add_animation(&mut self, animation: AnimatedParam) {
        self.animations.push(animation);
    }
}

/// One issue found in summary mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub stage: &'static str,
    pub element: String,
    pub message: String,
}

/// Complete diagnostics report over a document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub document: String,
    pub passed: bool,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn spine_checks(document: &Document) -> Result<(), DocumentError> {
    let mut validator = TimelineValidator::new(document.total_duration);
    for element in document.spine.iter() {
        element.validate_structure()?;
        validator.add_element(
            &element.name,
            element.offset,
            element.duration,
            element.lane.index(),
            element.kind().name(),
        )?;
    }
    validator.validate_complete()?;
    Ok(())
}

fn keyframe_checks(document: &Document) -> Result<(), DocumentError> {
    for animation in &document.animations {
        validate_sequence(animation.kind, &animation.keyframes).map_err(|source| {
            DocumentError::Keyframe {
                element: animation.element.clone(),
                source,
            }
        })?;
    }
    Ok(())
}

/// Validate a complete document against a populated registry.
///
/// Stage order: resource structural checks, spine structural checks (bounds,
/// overlap, lane structure), reference validation, keyframe final check.
/// Fail-fast: the first violation aborts the whole operation.
pub fn validate_document(document: &Document, registry: &Registry) -> Result<(), DocumentError> {
    debug!(document = %document.name, "validating document");

    for resource in registry.iter() {
        resource.validate()?;
    }
    spine_checks(document)?;
    validate_references(document, registry)?;
    keyframe_checks(document)?;

    info!(
        document = %document.name,
        elements = document.spine.len(),
        resources = registry.len(),
        "document validated"
    );
    Ok(())
}

/// Summary mode: continue past individual failures and report everything.
///
/// Used for diagnostics and testing, not the primary build path.
pub fn validate_summary(document: &Document, registry: &Registry) -> ValidationReport {
    let mut issues = Vec::new();

    for resource in registry.iter() {
        if let Err(e) = resource.validate() {
            issues.push(Issue {
                stage: "resources",
                element: resource.name().to_string(),
                message: e.to_string(),
            });
        }
    }

    let mut validator = TimelineValidator::new(document.total_duration);
    for element in document.spine.iter() {
        if let Err(e) = element.validate_structure() {
            issues.push(Issue {
                stage: "spine",
                element: element.name.clone(),
                message: e.to_string(),
            });
            continue;
        }
        if let Err(e) = validator.add_element(
            &element.name,
            element.offset,
            element.duration,
            element.lane.index(),
            element.kind().name(),
        ) {
            issues.push(Issue {
                stage: "spine",
                element: element.name.clone(),
                message: e.to_string(),
            });
        }
    }
    if let Err(e) = validator.validate_complete() {
        issues.push(Issue {
            stage: "spine",
            element: document.name.clone(),
            message: e.to_string(),
        });
    }

    for miss in collect_dangling(document, registry) {
        issues.push(Issue {
            stage: "references",
            element: miss.element,
            message: format!("dangling reference {:?}", miss.reference),
        });
    }

    for animation in &document.animations {
        if let Err(e) = validate_sequence(animation.kind, &animation.keyframes) {
            issues.push(Issue {
                stage: "keyframes",
                element: animation.element.clone(),
                message: e.to_string(),
            });
        }
    }

    let passed = issues.is_empty();
    if !passed {
        warn!(
            document = %document.name,
            issues = issues.len(),
            "document failed summary validation"
        );
    }
    ValidationReport {
        document: document.name.clone(),
        passed,
        issues,
    }
}
