//! Keyframe and animation-parameter validation.
//!
//! The target format animates a fixed set of parameter kinds, each with its
//! own rules for value shape, permitted auxiliary attributes, and numeric
//! range. The rule table is closed: adding a kind means updating every match
//! below, which is exactly where silent validator gaps get caught.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::KeyframeError;
use crate::time::Moment;

// ── Parameter kinds ─────────────────────────────────────────────

/// The animatable parameter kinds the document format understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Position,
    Scale,
    Rotation,
    Anchor,
    Opacity,
    Volume,
    Color,
}

impl ParamKind {
    /// All kinds, in rule-table order.
    pub const ALL: [ParamKind; 7] = [
        ParamKind::Position,
        ParamKind::Scale,
        ParamKind::Rotation,
        ParamKind::Anchor,
        ParamKind::Opacity,
        ParamKind::Volume,
        ParamKind::Color,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Position => "position",
            ParamKind::Scale => "scale",
            ParamKind::Rotation => "rotation",
            ParamKind::Anchor => "anchor",
            ParamKind::Opacity => "opacity",
            ParamKind::Volume => "volume",
            ParamKind::Color => "color",
        }
    }

    /// Look up a kind by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether keyframes of this kind may carry an `interp` attribute.
    pub fn allows_interp(self) -> bool {
        matches!(self, ParamKind::Opacity)
    }

    /// Whether keyframes of this kind may carry a `curve` attribute.
    pub fn allows_curve(self) -> bool {
        matches!(
            self,
            ParamKind::Scale | ParamKind::Rotation | ParamKind::Anchor | ParamKind::Opacity
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Keyframe value and attributes ───────────────────────────────

/// Interpolation tag (`interp` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interp {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
}

/// Curve tag (`curve` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    Linear,
    Smooth,
}

/// The value carried by a keyframe.
///
/// Most kinds carry one to four plain numbers; volume alone distinguishes a
/// decibel form from a linear multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValue {
    Components(SmallVec<[f64; 4]>),
    Volume { amount: f64, decibels: bool },
}

impl KeyframeValue {
    pub fn scalar(value: f64) -> Self {
        Self::Components(SmallVec::from_slice(&[value]))
    }

    pub fn pair(x: f64, y: f64) -> Self {
        Self::Components(SmallVec::from_slice(&[x, y]))
    }

    pub fn color(components: &[f64]) -> Self {
        Self::Components(SmallVec::from_slice(components))
    }

    pub fn volume_db(db: f64) -> Self {
        Self::Volume {
            amount: db,
            decibels: true,
        }
    }

    pub fn volume_linear(multiplier: f64) -> Self {
        Self::Volume {
            amount: multiplier,
            decibels: false,
        }
    }

    fn components(&self) -> Option<&[f64]> {
        match self {
            Self::Components(values) => Some(values),
            Self::Volume { .. } => None,
        }
    }
}

/// A single keyframe: a frame-aligned time, a value, and optional
/// interpolation/curve tags whose legality depends on the parameter kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: Moment,
    pub value: KeyframeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interp: Option<Interp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Curve>,
}

impl Keyframe {
    pub fn new(time: Moment, value: KeyframeValue) -> Self {
        Self {
            time,
            value,
            interp: None,
            curve: None,
        }
    }

    pub fn with_interp(mut self, interp: Interp) -> Self {
        self.interp = Some(interp);
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }
}

// ── Validation ──────────────────────────────────────────────────

fn expect_components<'a>(
    kind: ParamKind,
    kf: &'a Keyframe,
    expected: &'static str,
    count: &[usize],
) -> Result<&'a [f64], KeyframeError> {
    let components = kf
        .value
        .components()
        .ok_or(KeyframeError::InvalidValueShape {
            param: kind,
            expected,
        })?;
    if !count.contains(&components.len()) {
        return Err(KeyframeError::InvalidValueShape {
            param: kind,
            expected,
        });
    }
    Ok(components)
}

/// Validate a single keyframe against the rule table for `kind`.
pub fn validate_keyframe(kind: ParamKind, kf: &Keyframe) -> Result<(), KeyframeError> {
    if kf.interp.is_some() && !kind.allows_interp() {
        return Err(KeyframeError::AttributeNotAllowed {
            param: kind,
            attribute: "interp",
        });
    }
    if kf.curve.is_some() && !kind.allows_curve() {
        return Err(KeyframeError::AttributeNotAllowed {
            param: kind,
            attribute: "curve",
        });
    }

    match kind {
        ParamKind::Position => {
            expect_components(kind, kf, "2 numbers", &[2])?;
        }
        ParamKind::Scale => {
            let components = expect_components(kind, kf, "2 numbers", &[2])?;
            for &value in components {
                if value <= 0.0 {
                    return Err(KeyframeError::ValueOutOfRange {
                        param: kind,
                        value,
                        range: "> 0",
                    });
                }
            }
        }
        ParamKind::Rotation => {
            expect_components(kind, kf, "1 number", &[1])?;
        }
        ParamKind::Anchor => {
            expect_components(kind, kf, "2 numbers", &[2])?;
        }
        ParamKind::Opacity => {
            let components = expect_components(kind, kf, "1 number", &[1])?;
            let value = components[0];
            if !(0.0..=1.0).contains(&value) {
                return Err(KeyframeError::ValueOutOfRange {
                    param: kind,
                    value,
                    range: "[0, 1]",
                });
            }
        }
        ParamKind::Volume => match kf.value {
            KeyframeValue::Volume { amount, decibels } => {
                if decibels {
                    if !(-96.0..=96.0).contains(&amount) {
                        return Err(KeyframeError::ValueOutOfRange {
                            param: kind,
                            value: amount,
                            range: "[-96dB, +96dB]",
                        });
                    }
                } else if amount < 0.0 {
                    return Err(KeyframeError::ValueOutOfRange {
                        param: kind,
                        value: amount,
                        range: ">= 0 (linear multiplier)",
                    });
                }
            }
            KeyframeValue::Components(_) => {
                return Err(KeyframeError::InvalidValueShape {
                    param: kind,
                    expected: "1 number with optional dB suffix",
                });
            }
        },
        ParamKind::Color => {
            let components = expect_components(kind, kf, "3 or 4 numbers", &[3, 4])?;
            for &value in components {
                if !(0.0..=1.0).contains(&value) {
                    return Err(KeyframeError::ValueOutOfRange {
                        param: kind,
                        value,
                        range: "[0, 1]",
                    });
                }
            }
        }
    }

    Ok(())
}

/// Validate an ordered keyframe sequence for one parameter.
///
/// The sequence must be non-empty and non-decreasing in time; equal times are
/// a hold, not an error. Each keyframe is also checked against the rule table.
pub fn validate_sequence(kind: ParamKind, keyframes: &[Keyframe]) -> Result<(), KeyframeError> {
    if keyframes.is_empty() {
        return Err(KeyframeError::EmptySequence);
    }
    for (index, kf) in keyframes.iter().enumerate() {
        validate_keyframe(kind, kf)?;
        if index > 0 {
            let previous = keyframes[index - 1].time;
            if kf.time < previous {
                return Err(KeyframeError::NotChronological {
                    index,
                    time: kf.time,
                    previous,
                });
            }
        }
    }
    Ok(())
}

// ── Series builder ──────────────────────────────────────────────

/// Accumulates keyframes for one parameter, rejecting rule-table violations
/// at add time. Chronology and non-emptiness are checked by [`build`].
///
/// [`build`]: KeyframeSeries::build
#[derive(Debug, Clone)]
pub struct KeyframeSeries {
    kind: ParamKind,
    keyframes: Vec<Keyframe>,
}

impl KeyframeSeries {
    pub fn new(kind: ParamKind) -> Self {
        Self {
            kind,
            keyframes: Vec::new(),
        }
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Add a keyframe, validating its shape and attributes immediately.
    pub fn push(&mut self, kf: Keyframe) -> Result<(), KeyframeError> {
        validate_keyframe(self.kind, &kf)?;
        self.keyframes.push(kf);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Run the final sequence analysis and yield the validated series.
    pub fn build(self) -> Result<Vec<Keyframe>, KeyframeError> {
        validate_sequence(self.kind, &self.keyframes)?;
        Ok(self.keyframes)
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn at(frames: i64, value: KeyframeValue) -> Keyframe {
        Keyframe::new(Moment::from_frames(frames), value)
    }

    #[test]
    fn test_position_rejects_curve() {
        let kf = at(0, KeyframeValue::pair(100.0, 50.0)).with_curve(Curve::Smooth);
        assert_eq!(
            validate_keyframe(ParamKind::Position, &kf),
            Err(KeyframeError::AttributeNotAllowed {
                param: ParamKind::Position,
                attribute: "curve",
            })
        );
        // The identical keyframe without the curve attribute is fine.
        let kf = at(0, KeyframeValue::pair(100.0, 50.0));
        assert_eq!(validate_keyframe(ParamKind::Position, &kf), Ok(()));
    }

    #[test]
    fn test_interp_only_on_opacity() {
        for kind in ParamKind::ALL {
            let value = match kind {
                ParamKind::Position | ParamKind::Anchor => KeyframeValue::pair(0.0, 0.0),
                ParamKind::Scale => KeyframeValue::pair(1.0, 1.0),
                ParamKind::Rotation => KeyframeValue::scalar(45.0),
                ParamKind::Opacity => KeyframeValue::scalar(0.5),
                ParamKind::Volume => KeyframeValue::volume_linear(1.0),
                ParamKind::Color => KeyframeValue::color(&[0.1, 0.2, 0.3]),
            };
            let kf = at(0, value).with_interp(Interp::EaseIn);
            let result = validate_keyframe(kind, &kf);
            if kind.allows_interp() {
                assert_eq!(result, Ok(()), "{kind}");
            } else {
                assert!(
                    matches!(result, Err(KeyframeError::AttributeNotAllowed { .. })),
                    "{kind}"
                );
            }
        }
    }

    #[test]
    fn test_scale_must_be_positive() {
        let kf = at(0, KeyframeValue::pair(1.0, 0.0));
        assert!(matches!(
            validate_keyframe(ParamKind::Scale, &kf),
            Err(KeyframeError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_opacity_range() {
        assert!(validate_keyframe(ParamKind::Opacity, &at(0, KeyframeValue::scalar(1.0))).is_ok());
        assert!(matches!(
            validate_keyframe(ParamKind::Opacity, &at(0, KeyframeValue::scalar(1.5))),
            Err(KeyframeError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_volume_forms() {
        assert!(
            validate_keyframe(ParamKind::Volume, &at(0, KeyframeValue::volume_db(-12.0))).is_ok()
        );
        assert!(matches!(
            validate_keyframe(ParamKind::Volume, &at(0, KeyframeValue::volume_db(-120.0))),
            Err(KeyframeError::ValueOutOfRange { .. })
        ));
        assert!(
            validate_keyframe(ParamKind::Volume, &at(0, KeyframeValue::volume_linear(2.0))).is_ok()
        );
        assert!(matches!(
            validate_keyframe(
                ParamKind::Volume,
                &at(0, KeyframeValue::volume_linear(-0.1))
            ),
            Err(KeyframeError::ValueOutOfRange { .. })
        ));
        // A plain number is the wrong shape for volume.
        assert!(matches!(
            validate_keyframe(ParamKind::Volume, &at(0, KeyframeValue::scalar(1.0))),
            Err(KeyframeError::InvalidValueShape { .. })
        ));
    }

    #[test]
    fn test_color_shape_and_range() {
        assert!(
            validate_keyframe(ParamKind::Color, &at(0, KeyframeValue::color(&[0.0, 0.5, 1.0])))
                .is_ok()
        );
        assert!(validate_keyframe(
            ParamKind::Color,
            &at(0, KeyframeValue::color(&[0.0, 0.5, 1.0, 0.8]))
        )
        .is_ok());
        assert!(matches!(
            validate_keyframe(ParamKind::Color, &at(0, KeyframeValue::pair(0.0, 0.5))),
            Err(KeyframeError::InvalidValueShape { .. })
        ));
        assert!(matches!(
            validate_keyframe(
                ParamKind::Color,
                &at(0, KeyframeValue::color(&[0.0, 0.5, 1.2]))
            ),
            Err(KeyframeError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_sequence_chronology() {
        let kfs = vec![
            at(0, KeyframeValue::scalar(0.0)),
            at(10, KeyframeValue::scalar(0.5)),
            at(10, KeyframeValue::scalar(0.7)), // equal time is a hold
            at(5, KeyframeValue::scalar(1.0)),
        ];
        assert!(validate_sequence(ParamKind::Opacity, &kfs[..3]).is_ok());
        assert_eq!(
            validate_sequence(ParamKind::Opacity, &kfs),
            Err(KeyframeError::NotChronological {
                index: 3,
                time: Moment::from_frames(5),
                previous: Moment::from_frames(10),
            })
        );
    }

    #[test]
    fn test_empty_sequence_rejected_single_allowed() {
        assert_eq!(
            validate_sequence(ParamKind::Rotation, &[]),
            Err(KeyframeError::EmptySequence)
        );
        let single = [at(0, KeyframeValue::scalar(90.0))];
        assert!(validate_sequence(ParamKind::Rotation, &single).is_ok());
    }

    #[test]
    fn test_series_rejects_at_push_time() {
        let mut series = KeyframeSeries::new(ParamKind::Position);
        let bad = at(0, KeyframeValue::pair(0.0, 0.0)).with_curve(Curve::Linear);
        assert!(series.push(bad).is_err());
        assert!(series.is_empty());

        series.push(at(0, KeyframeValue::pair(0.0, 0.0))).unwrap();
        series.push(at(24, KeyframeValue::pair(50.0, 0.0))).unwrap();
        assert_eq!(series.build().unwrap().len(), 2);
    }

    #[test]
    fn test_series_build_catches_disorder() {
        let mut series = KeyframeSeries::new(ParamKind::Rotation);
        series.push(at(10, KeyframeValue::scalar(0.0))).unwrap();
        series.push(at(5, KeyframeValue::scalar(90.0))).unwrap();
        assert!(matches!(
            series.build(),
            Err(KeyframeError::NotChronological { .. })
        ));
    }

    #[test]
    fn test_param_kind_names_roundtrip() {
        for kind in ParamKind::ALL {
            assert_eq!(ParamKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ParamKind::from_name("blur"), None);
    }
}
