//! Integration tests for document construction.
//!
//! Exercises cross-crate interactions between cutplan-core and
//! cutplan-timeline: transactional resource creation, spine assembly, and
//! whole-document validation.

use cutplan_core::{Keyframe, KeyframeValue, Lane, Moment, ParamKind, ResourceId, Span};
use cutplan_timeline::{
    validate_document, validate_summary, AnimatedParam, Document, DocumentError, MediaKind,
    Registry, SpineBuilder, SpineElement, Transaction,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ── End-to-end build ───────────────────────────────────────────

/// Reserve 2 identifiers, create one video asset and one format, commit;
/// place one clip covering the whole timeline; validation passes. Breaking
/// the clip's reference makes the same validation fail.
#[test]
fn end_to_end_build_and_break() {
    init_tracing();
    let mut registry = Registry::new();

    let asset_id;
    {
        let mut tx = Transaction::new(&mut registry, 2);
        asset_id = tx
            .create_asset(
                "Interview",
                "media/interview.mov",
                MediaKind::Video,
                Span::parse("240240/24000s").unwrap(),
            )
            .unwrap();
        tx.create_format(
            "FFVideoFormat1080p2398",
            1920,
            1080,
            cutplan_timeline::FormatKind::Video,
            Some(Span::from_frames(1)),
        )
        .unwrap();
        tx.commit().unwrap();
    }
    assert_eq!(registry.len(), 2);

    let total = Span::parse("240240/24000s").unwrap();
    let mut builder = SpineBuilder::new(total);
    builder
        .add_element(SpineElement::clip(
            "Interview",
            Moment::parse("0s").unwrap(),
            total,
            Lane::PRIMARY,
            asset_id,
        ))
        .unwrap();

    let document = Document::new("Cut 1", total, builder.build().unwrap());
    assert!(validate_document(&document, &registry).is_ok());

    // Re-point the clip at an unregistered identifier.
    let mut broken = document.clone();
    broken.spine.clips[0] = SpineElement::clip(
        "Interview",
        Moment::ZERO,
        total,
        Lane::PRIMARY,
        ResourceId::new(42).unwrap(),
    );
    assert!(matches!(
        validate_document(&broken, &registry),
        Err(DocumentError::DanglingReference { .. })
    ));
}

// ── Transaction discipline ─────────────────────────────────────

#[test]
fn identifier_uniqueness_survives_rollback() {
    let mut registry = Registry::new();

    let first: Vec<ResourceId> = {
        let mut tx = Transaction::new(&mut registry, 5);
        let ids = tx.reserved_ids().to_vec();
        tx.rollback().unwrap();
        ids
    };

    let second: Vec<ResourceId> = {
        let tx = Transaction::new(&mut registry, 5);
        tx.reserved_ids().to_vec()
    };

    for id in &second {
        assert!(!first.contains(id), "{id} issued twice");
    }
}

#[test]
fn atomicity_across_partial_failure() {
    let mut registry = Registry::new();
    let mut tx = Transaction::new(&mut registry, 3);

    tx.create_asset("A", "media/a.mov", MediaKind::Video, Span::from_frames(100))
        .unwrap();
    tx.create_asset("B", "media/b.png", MediaKind::Image, Span::ZERO)
        .unwrap();
    // Image asset with a nonzero duration fails validation.
    assert!(tx
        .create_asset("C", "media/c.png", MediaKind::Image, Span::from_frames(1))
        .is_err());

    tx.rollback().unwrap();
    drop(tx);
    assert!(registry.is_empty());
}

#[test]
fn dedup_by_source_path_across_calls() {
    let mut registry = Registry::new();
    let (a, existed_a) = registry
        .get_or_create_asset("media/a.mov", "A", MediaKind::Video, Span::from_frames(100))
        .unwrap();
    let (b, existed_b) = registry
        .get_or_create_asset("media/a.mov", "A2", MediaKind::Video, Span::from_frames(50))
        .unwrap();
    assert_eq!(a, b);
    assert!(!existed_a);
    assert!(existed_b);
}

// ── Placement rules through the builder ────────────────────────

#[test]
fn lane_gap_rejected_unless_permitted() {
    let asset = ResourceId::new(1).unwrap();
    let total = Span::from_frames(1000);

    let mut builder = SpineBuilder::new(total);
    builder
        .add_element(SpineElement::clip(
            "a",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::new(1).unwrap(),
            asset,
        ))
        .unwrap();
    builder
        .add_element(SpineElement::clip(
            "b",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::new(3).unwrap(),
            asset,
        ))
        .unwrap();
    assert!(builder.build().is_err());

    let mut builder = SpineBuilder::new(total);
    builder.permit_lane_gaps();
    builder
        .add_element(SpineElement::clip(
            "a",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::new(1).unwrap(),
            asset,
        ))
        .unwrap();
    builder
        .add_element(SpineElement::clip(
            "b",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::new(3).unwrap(),
            asset,
        ))
        .unwrap();
    assert!(builder.build().is_ok());
}

#[test]
fn chronological_order_with_lane_tiebreak() {
    let asset = ResourceId::new(1).unwrap();
    let mut builder = SpineBuilder::new(Span::from_seconds(20.0));

    for (name, offset, on_lane) in [("late", 10.0, 2), ("first", 0.0, 1), ("middle", 5.0, 1)] {
        builder
            .add_element(SpineElement::clip(
                name,
                Moment::from_seconds(offset),
                Span::from_seconds(4.0),
                Lane::new(on_lane).unwrap(),
                asset,
            ))
            .unwrap();
    }

    let sorted = builder.sort_and_validate().unwrap();
    let names: Vec<_> = sorted.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["first", "middle", "late"]);
}

// ── Summary diagnostics ────────────────────────────────────────

#[test]
fn summary_report_is_complete_and_serializable() {
    let registry = Registry::new();
    let total = Span::from_frames(100);

    let mut builder = SpineBuilder::new(total);
    builder.permit_lane_gaps();
    builder
        .add_element(SpineElement::clip(
            "orphan",
            Moment::ZERO,
            Span::from_frames(100),
            Lane::PRIMARY,
            ResourceId::new(9).unwrap(),
        ))
        .unwrap();

    let mut document = Document::new("Diag", total, builder.build().unwrap());
    document.add_animation(AnimatedParam {
        element: "orphan".to_string(),
        kind: ParamKind::Opacity,
        keyframes: vec![
            Keyframe::new(Moment::from_frames(10), KeyframeValue::scalar(1.0)),
            Keyframe::new(Moment::from_frames(5), KeyframeValue::scalar(0.0)),
        ],
    });

    let report = validate_summary(&document, &registry);
    assert!(!report.passed);
    assert_eq!(report.issues.len(), 2);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["document"], "Diag");
    assert_eq!(json["issues"].as_array().unwrap().len(), 2);
}
