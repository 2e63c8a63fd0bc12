//! Curve primitives: control points, piecewise-linear curves, and piecewise
//! cubic Bezier curves.

pub mod bezier;
pub mod control_point;
pub mod linear;
