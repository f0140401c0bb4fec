//! Cutplan Timeline - Validation-first document assembly
//!
//! Implements the document construction engine:
//! - Resource registry with transactional, all-or-nothing staging
//! - Timeline placement validation (bounds, overlap, lane structure)
//! - Typed spine elements with chronological sorting and partitioning
//! - Cross-reference validation and the whole-document orchestrator
//!
//! Every public operation either leaves the document provably consistent or
//! fails without mutating anything.

pub mod document;
pub mod element;
pub mod error;
pub mod reference;
pub mod registry;
pub mod resource;
pub mod spine;
pub mod transaction;
pub mod validator;

pub use document::{validate_document, validate_summary, AnimatedParam, Document, ValidationReport};
pub use element::{ConnectedElement, ElementKind, Payload, SpineElement};
pub use error::{DocumentError, ResourceError, TimelineError};
pub use reference::{collect_dangling, validate_references, Dangling};
pub use registry::Registry;
pub use resource::{FormatKind, MediaKind, Resource};
pub use spine::{SpineBuilder, SpineGroups};
pub use transaction::{Transaction, TxState};
pub use validator::{PlacedElement, TimelineStats, TimelineValidator};
