//! Resource identifiers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;

/// A document-unique resource identifier of the form `"r" + positive integer`.
///
/// Identifiers are issued by the registry's monotonic counter and are never
/// reused within a document's lifetime, even when the transaction that
/// reserved them rolls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(NonZeroU32);

impl ResourceId {
    /// Construct from a numeric index; zero is not a valid identifier.
    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    /// Parse the textual form `"rN"`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('r')?;
        // Reject forms like "r+3" or "r03" that would not round-trip.
        if digits.is_empty() || digits.starts_with('0') || digits.starts_with('+') {
            return None;
        }
        digits.parse::<u32>().ok().and_then(Self::new)
    }

    /// Numeric part of the identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ResourceId::parse(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid resource id: {text:?}")))
    }
}
