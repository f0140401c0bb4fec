//! Best-effort fixups for legacy documents.
//!
//! Migration runs over pre-validation text only, as an explicit pass separate
//! from validation: repaired output is always handed back to the core's
//! validators, and any remaining failure is surfaced, never swallowed. The
//! compatibility mode is an explicit parameter, not ambient state, so
//! behavior is deterministic and testable.

use std::borrow::Cow;

use tracing::warn;

/// How aggressively to repair legacy input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatMode {
    /// No repair; input passes through unchanged.
    #[default]
    Strict,
    /// Repair, logging each fixup.
    Warn,
    /// Repair silently.
    Lenient,
}

/// Outcome of a repair pass over one textual value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair<'a> {
    pub text: Cow<'a, str>,
    pub repaired: bool,
}

fn looks_numeric(body: &str) -> bool {
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == '/' || c == '-')
}

/// Apply best-effort fixups to a textual time value.
///
/// Known legacy defects: surrounding/internal whitespace and a missing `s`
/// unit suffix. The result is *not* guaranteed valid — callers re-validate
/// with [`cutplan_core::time::validate`].
pub fn migrate_time_text(text: &str, mode: CompatMode) -> Repair<'_> {
    if mode == CompatMode::Strict {
        return Repair {
            text: Cow::Borrowed(text),
            repaired: false,
        };
    }

    let mut fixed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if looks_numeric(&fixed) {
        fixed.push('s');
    }

    if fixed == text {
        Repair {
            text: Cow::Borrowed(text),
            repaired: false,
        }
    } else {
        if mode == CompatMode::Warn {
            warn!(original = text, repaired = %fixed, "repaired legacy time value");
        }
        Repair {
            text: Cow::Owned(fixed),
            repaired: true,
        }
    }
}
