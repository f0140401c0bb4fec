//! Integration tests for the serialization boundary.
//!
//! Covers the migrate → validate → render pipeline: legacy text repair,
//! authoritative re-validation, and XML emission shape.

use cutplan_core::{time, Lane, Moment, Span};
use cutplan_timeline::{Document, MediaKind, Registry, SpineBuilder, SpineElement, Transaction};
use cutplan_xml::{migrate_time_text, render, scrub_text, CompatMode};

fn build_document() -> (Document, Registry) {
    let mut registry = Registry::new();
    let (asset, title_effect) = {
        let mut tx = Transaction::new(&mut registry, 2);
        let asset = tx
            .create_asset("B-roll", "media/broll.mov", MediaKind::Video, Span::from_frames(480))
            .unwrap();
        let effect = tx.create_effect("Basic Title", "uid-basic-title").unwrap();
        tx.commit().unwrap();
        (asset, effect)
    };

    let total = Span::from_frames(480);
    let mut builder = SpineBuilder::new(total);
    builder
        .add_element(SpineElement::clip(
            "B-roll",
            Moment::ZERO,
            total,
            Lane::PRIMARY,
            asset,
        ))
        .unwrap();
    builder
        .add_element(
            SpineElement::title(
                "Opener",
                Moment::from_frames(24),
                Span::from_frames(96),
                Lane::new(1).unwrap(),
                title_effect,
                "Welcome",
            )
            .with_style_refs(vec!["ts1".to_string()]),
        )
        .unwrap();

    let mut document = Document::new("Pipeline", total, builder.build().unwrap());
    document.define_style("ts1");
    (document, registry)
}

#[test]
fn migrate_then_validate_is_two_explicit_passes() {
    // Legacy value missing its suffix: repair fixes the text,
    // the core still decides validity.
    let legacy = "480480/24000";
    assert!(time::validate(legacy).is_err());

    let repaired = migrate_time_text(legacy, CompatMode::Lenient);
    assert!(repaired.repaired);
    assert!(time::validate(&repaired.text).is_ok());

    // Strict mode performs no repair and the original error surfaces.
    let strict = migrate_time_text(legacy, CompatMode::Strict);
    assert!(!strict.repaired);
    assert!(time::validate(&strict.text).is_err());
}

#[test]
fn migration_cannot_rescue_misaligned_times() {
    let repaired = migrate_time_text(" 1000/24000 ", CompatMode::Lenient);
    assert!(repaired.repaired);
    assert!(matches!(
        time::validate(&repaired.text),
        Err(cutplan_core::TimeError::NotFrameAligned { .. })
    ));
}

#[test]
fn scrub_runs_before_structural_checks() {
    let name = scrub_text("  Opener\u{0007}  ");
    assert_eq!(name, "Opener");
}

#[test]
fn render_produces_grouped_spine() {
    let (document, registry) = build_document();
    let xml = render(&document, &registry).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\""));
    assert!(xml.contains("<resources>"));
    assert!(xml.contains("<asset id=\"r1\""));
    assert!(xml.contains("<effect id=\"r2\""));
    assert!(xml.contains("<spine>"));
    assert!(xml.contains("<text-style-ref ref=\"ts1\"/>"));
    // Primary-lane clip carries no lane attribute.
    assert!(!xml.contains("lane=\"0\""));
}

#[test]
fn render_rejects_tampered_document() {
    let (mut document, registry) = build_document();
    document.style_defs.clear(); // orphan the title's style ref
    assert!(render(&document, &registry).is_err());
}
