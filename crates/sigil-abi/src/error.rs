//! Error types for the ABI and wire layers.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a payload.
///
/// Decoding is strict: any failure aborts the decode and partial output is
/// discarded, never returned as success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("input truncated while decoding '{field}': {needed} more element(s) needed")]
    TruncatedInput { field: String, needed: usize },

    #[error("enum discriminant {got} out of range for '{field}' ({variant_count} variant(s))")]
    DiscriminantOutOfRange {
        field: String,
        got: u64,
        variant_count: usize,
    },

    #[error("type mismatch at '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("value too wide at '{field}': {len} bytes exceed the {max}-byte limit")]
    ValueTooWide {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("{remaining} trailing element(s) left after decoding completed")]
    TrailingElements { remaining: usize },
}
