//! Document layer: decoding hierarchical documents into a flat namespace.
//!
//! This module provides:
//! - Format detection and decoding into a format-agnostic tree ([`DocumentFormat`])
//! - Depth-first flattening into dotted/bracketed keys ([`flatten`])
//! - List-aware layering of flattened profiles ([`overlay`])
//!
//! The decoded tree is a [`serde_json::Value`] built with insertion order
//! preserved, so flattened keys come out in document order.

mod error;
mod flatten;
mod format;
mod overlay;

#[cfg(test)]
mod flatten_tests;

pub use error::DocumentError;
pub use flatten::{FlatMap, flatten};
pub use format::DocumentFormat;
pub use overlay::{list_root, overlay};
