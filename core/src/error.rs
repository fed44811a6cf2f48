//! Error types for value normalization.
//!
//! # Design
//! Every encoder in this crate is total over its input domain, so there is a
//! single failure mode: the strict text entry point was handed something that
//! is not text. Everything else (unrepresentable characters, uploads in the
//! wrong encoder, unencodable hosts) degrades with a logged warning instead.

/// Errors returned by the strict normalization entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A function that only works on text received another kind of value.
    #[error("{function} accepts only {expected} values, got {actual}")]
    InvalidArgument {
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}
