//! Crate-wide error type.
//!
//! Every fallible function in this crate returns a [`Result`] built on [`Error`].
//! User/model errors (bad space name, out-of-range ordinate) and invariant
//! violations (non-monotonic curve, degenerate rational) share one enum because
//! callers generally need to match on *all* of them at the query boundary; the
//! doc comment on each variant says which category it belongs to.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// User/model error: an ordinate or index fell outside the bounds it was
    /// projected against.
    #[error("ordinate/index out of bounds: {context}")]
    OutOfBounds { context: String },

    /// User/model error: no path exists between the requested spaces in the
    /// topological map.
    #[error("no path from '{source_space}' to '{dest_space}'")]
    NoPath {
        source_space: String,
        dest_space: String,
    },

    /// Invariant violation: a topology was required to be non-empty but has no
    /// mappings.
    #[error("topology is empty: {context}")]
    EmptyTopology { context: String },

    /// Invariant violation: a rational division by zero was attempted and the
    /// result is not representable as a signed infinity (0/0).
    #[error("division by zero in rational arithmetic: {context}")]
    DivByZero { context: String },

    /// Invariant violation: a mapping or curve that was required to be
    /// monotonic non-decreasing in its input was not.
    #[error("non-monotonic input in {context}")]
    NonMonotonicInput { context: String },

    /// Invariant violation: two discrete-info rates could not be compared or
    /// combined exactly (e.g. mismatched or non-finite rational rates).
    #[error("incompatible sample rates: {context}")]
    IncompatibleRates { context: String },

    /// Numerical edge case: Newton's method for Bezier find-u failed to
    /// converge within the configured iteration budget, or the hodograph root
    /// finder found no real root inside the segment's valid domain.
    #[error("find-u failed to converge in segment {segment_index} for input {input}")]
    FindUDiverged { segment_index: usize, input: f64 },
}

impl Error {
    pub fn out_of_bounds(context: impl Into<String>) -> Self {
        Error::OutOfBounds {
            context: context.into(),
        }
    }

    pub fn no_path(source_space: impl Into<String>, dest_space: impl Into<String>) -> Self {
        Error::NoPath {
            source_space: source_space.into(),
            dest_space: dest_space.into(),
        }
    }

    pub fn empty_topology(context: impl Into<String>) -> Self {
        Error::EmptyTopology {
            context: context.into(),
        }
    }

    pub fn div_by_zero(context: impl Into<String>) -> Self {
        Error::DivByZero {
            context: context.into(),
        }
    }

    pub fn non_monotonic_input(context: impl Into<String>) -> Self {
        Error::NonMonotonicInput {
            context: context.into(),
        }
    }

    pub fn incompatible_rates(context: impl Into<String>) -> Self {
        Error::IncompatibleRates {
            context: context.into(),
        }
    }
}
