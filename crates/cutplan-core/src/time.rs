//! Time representation for the fixed 23.976 fps document timebase.
//!
//! Every time value in the target format is a rational number of seconds with
//! a fixed denominator of 24000, and must land exactly on a display frame
//! boundary, i.e. the numerator must be a multiple of 1001 (one frame is
//! 1001/24000 s). Frame alignment is a structural invariant here: `Moment`
//! and `Span` store the frame count directly, so no arithmetic can produce a
//! misaligned value. The textual rational form exists only at the
//! serialization boundary.

use num_rational::Rational64;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

use crate::error::TimeError;

/// Ticks per second of the fixed document timebase.
pub const TIMEBASE: i64 = 24000;

/// Ticks per frame at 23.976 fps (24000/1001).
pub const FRAME_TICKS: i64 = 1001;

/// Duration of one frame in seconds.
pub const FRAME_SECONDS: f64 = FRAME_TICKS as f64 / TIMEBASE as f64;

/// Validate an externally-supplied textual time value without constructing it.
///
/// Accepted forms: the literal `"0s"`, integer seconds (`"5s"` — rarely frame
/// aligned, but the check is the same), and the canonical rational form
/// `"N/24000s"`. The literal zero always succeeds.
pub fn validate(text: &str) -> Result<(), TimeError> {
    parse_ticks(text).map(|_| ())
}

/// Parse a textual time value into whole ticks (numerator over 24000).
fn parse_ticks(text: &str) -> Result<i64, TimeError> {
    let body = text
        .strip_suffix('s')
        .ok_or_else(|| TimeError::MalformedRational(text.to_string()))?;

    if body == "0" || body == "-0" {
        return Ok(0);
    }

    let ticks = match body.split_once('/') {
        Some((numer, denom)) => {
            let numerator: i64 = numer
                .parse()
                .map_err(|_| TimeError::MalformedRational(text.to_string()))?;
            let denominator: i64 = denom
                .parse()
                .map_err(|_| TimeError::MalformedRational(text.to_string()))?;
            if denominator != TIMEBASE {
                return Err(TimeError::WrongTimebase { denominator });
            }
            numerator
        }
        None => {
            let seconds: i64 = body
                .parse()
                .map_err(|_| TimeError::MalformedRational(text.to_string()))?;
            seconds
                .checked_mul(TIMEBASE)
                .ok_or_else(|| TimeError::MalformedRational(text.to_string()))?
        }
    };

    if ticks % FRAME_TICKS != 0 {
        return Err(TimeError::NotFrameAligned { numerator: ticks });
    }
    Ok(ticks)
}

fn format_ticks(frames: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if frames == 0 {
        write!(f, "0s")
    } else {
        write!(f, "{}/{}s", frames * FRAME_TICKS, TIMEBASE)
    }
}

fn frames_from_seconds(seconds: f64) -> i64 {
    let frames = (seconds / FRAME_SECONDS).round();
    if frames.is_nan() || frames <= 0.0 {
        0
    } else if frames >= i64::MAX as f64 {
        i64::MAX
    } else {
        frames as i64
    }
}

// ── Moment ──────────────────────────────────────────────────────

/// A zero-or-positive point in time, stored as a whole number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Moment {
    frames: i64,
}

impl Moment {
    /// Time zero.
    pub const ZERO: Self = Self { frames: 0 };

    /// Construct from a whole frame count. Negative counts clamp to zero.
    #[inline]
    pub fn from_frames(frames: i64) -> Self {
        Self {
            frames: frames.max(0),
        }
    }

    /// Construct from seconds, rounding to the nearest frame boundary.
    /// Never fails; negative input clamps to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            frames: frames_from_seconds(seconds),
        }
    }

    /// Parse a validated textual form into a `Moment`.
    pub fn parse(text: &str) -> Result<Self, TimeError> {
        let ticks = parse_ticks(text)?;
        if ticks < 0 {
            return Err(TimeError::MalformedRational(text.to_string()));
        }
        Ok(Self {
            frames: ticks / FRAME_TICKS,
        })
    }

    /// Whole frame count since time zero.
    #[inline]
    pub fn frames(self) -> i64 {
        self.frames
    }

    /// Numerator of the canonical rational form (frames × 1001).
    #[inline]
    pub fn numerator(self) -> i64 {
        self.frames * FRAME_TICKS
    }

    /// Exact value in seconds as a reduced rational.
    #[inline]
    pub fn to_rational(self) -> Rational64 {
        Rational64::new(self.numerator(), TIMEBASE)
    }

    /// Value in seconds as a float.
    #[inline]
    pub fn to_seconds(self) -> f64 {
        self.frames as f64 * FRAME_SECONDS
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.frames == 0
    }

    /// Subtract a span, returning `None` if the result would be negative.
    pub fn checked_sub(self, span: Span) -> Option<Self> {
        let frames = self.frames - span.frames();
        (frames >= 0).then_some(Self { frames })
    }

    /// Distance to a later moment, `None` if `other` precedes `self`.
    pub fn span_until(self, other: Moment) -> Option<Span> {
        let frames = other.frames - self.frames;
        (frames >= 0).then_some(Span { frames })
    }
}

impl Add<Span> for Moment {
    type Output = Moment;
    /// Saturates at the representable maximum instead of overflowing.
    fn add(self, rhs: Span) -> Moment {
        Moment {
            frames: self.frames.saturating_add(rhs.frames),
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_ticks(self.frames, f)
    }
}

// ── Span ────────────────────────────────────────────────────────

/// A non-negative duration, stored as a whole number of frames.
///
/// Zero-length spans are representable; whether a zero duration is legal for
/// a given element is enforced by the timeline validator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    frames: i64,
}

impl Span {
    /// Zero duration.
    pub const ZERO: Self = Self { frames: 0 };

    /// One frame.
    pub const FRAME: Self = Self { frames: 1 };

    /// Construct from a whole frame count. Negative counts clamp to zero.
    #[inline]
    pub fn from_frames(frames: i64) -> Self {
        Self {
            frames: frames.max(0),
        }
    }

    /// Construct from seconds, rounding to the nearest frame boundary.
    /// Never fails; negative input clamps to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            frames: frames_from_seconds(seconds),
        }
    }

    /// Parse a validated textual form into a `Span`.
    pub fn parse(text: &str) -> Result<Self, TimeError> {
        let ticks = parse_ticks(text)?;
        if ticks < 0 {
            return Err(TimeError::MalformedRational(text.to_string()));
        }
        Ok(Self {
            frames: ticks / FRAME_TICKS,
        })
    }

    #[inline]
    pub fn frames(self) -> i64 {
        self.frames
    }

    /// Numerator of the canonical rational form (frames × 1001).
    #[inline]
    pub fn numerator(self) -> i64 {
        self.frames * FRAME_TICKS
    }

    /// Exact value in seconds as a reduced rational.
    #[inline]
    pub fn to_rational(self) -> Rational64 {
        Rational64::new(self.numerator(), TIMEBASE)
    }

    /// Value in seconds as a float.
    #[inline]
    pub fn to_seconds(self) -> f64 {
        self.frames as f64 * FRAME_SECONDS
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.frames == 0
    }

    /// Subtract, returning `None` if the result would be negative.
    pub fn checked_sub(self, other: Span) -> Option<Self> {
        let frames = self.frames - other.frames;
        (frames >= 0).then_some(Self { frames })
    }
}

impl Add for Span {
    type Output = Span;
    /// Saturates at the representable maximum instead of overflowing.
    fn add(self, rhs: Span) -> Span {
        Span {
            frames: self.frames.saturating_add(rhs.frames),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_ticks(self.frames, f)
    }
}

// ── TimeRange ───────────────────────────────────────────────────

/// A half-open interval `[start, start + duration)` on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Moment,
    pub duration: Span,
}

impl TimeRange {
    #[inline]
    pub fn new(start: Moment, duration: Span) -> Self {
        Self { start, duration }
    }

    /// End of the interval (exclusive).
    #[inline]
    pub fn end(self) -> Moment {
        self.start + self.duration
    }

    /// Whether a moment falls inside the interval.
    #[inline]
    pub fn contains(self, time: Moment) -> bool {
        time >= self.start && time < self.end()
    }

    /// Half-open overlap test: touching endpoints do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

// ── Serde (textual rational form) ───────────────────────────────

impl Serialize for Moment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Moment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Moment::parse(&text).map_err(D::Error::custom)
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Span::parse(&text).map_err(D::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────
