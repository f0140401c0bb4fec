//! Cutplan XML - Serialization boundary
//!
//! The thin layers between validated documents and on-disk text:
//! - XML emission over already-validated document trees
//! - Best-effort migration fixups for legacy input (pre-validation only)
//! - Text scrubbing for string-valued attributes
//!
//! None of this contains validation logic of its own; the document
//! orchestrator in cutplan-timeline remains the single authority.

pub mod migrate;
pub mod scrub;
pub mod writer;

pub use migrate::{migrate_time_text, CompatMode, Repair};
pub use scrub::scrub_text;
pub use writer::{render, write_document, WriteError};
