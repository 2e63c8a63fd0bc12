#![allow(dead_code)]
//! Tuning parameters for curve evaluation and linearization.
//!
//! The source this crate is modeled on kept `u_val_of_midpoint` and `fudge` as
//! process-wide mutable globals inside its curve code. Here they are plain
//! constructor parameters threaded through [`crate::curve::bezier::BezierCurve`]
//! and [`crate::operator::ProjectionOperator`] — no process-wide state.

use serde::{Deserialize, Serialize};

/// Configuration for numerical tolerances used by the curve and topology code.
/// Keep this minimal; expand as needed without breaking the public API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Maximum Newton-Raphson iterations for Bezier find-u before reporting
    /// [`crate::error::Error::FindUDiverged`].
    pub newton_max_iterations: u32,

    /// Convergence epsilon for Newton-Raphson find-u: iteration stops once the
    /// residual `|B_x(u) - x|` falls below this value.
    pub newton_epsilon: f64,

    /// Epsilon used when searching for real hodograph roots in `(0, 1)` and
    /// when comparing input ordinates against segment/knot boundaries.
    pub root_epsilon: f64,

    /// Number of samples per Bezier segment used by [`linearize`] to build a
    /// [`crate::curve::linear::LinearCurve`] approximation.
    ///
    /// [`linearize`]: crate::curve::bezier::BezierCurve::linearize
    pub linearization_samples_per_segment: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            newton_max_iterations: 32,
            newton_epsilon: 1e-9,
            root_epsilon: 1e-9,
            linearization_samples_per_segment: 16,
        }
    }
}
