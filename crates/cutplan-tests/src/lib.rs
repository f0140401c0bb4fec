//! Integration test crate for Cutplan.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every cutplan crate to verify they work together.

#[cfg(test)]
mod document;

#[cfg(test)]
mod pipeline;
