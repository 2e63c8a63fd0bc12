#![allow(dead_code)]
//! The atomic transform between two 1D continuous spaces.
//!
//! Every `Mapping`'s `output = f(input)` is defined over a single contiguous
//! half-open input interval. Non-empty mappings are monotonic non-decreasing
//! in input *unless* they are explicitly piecewise-linear with a declared
//! reversal (used for reverse warps) — see [`Mapping::Linear`].

use crate::config::Config;
use crate::curve::bezier::{BezierCurve, BezierSegment};
use crate::curve::control_point::ControlPoint;
use crate::curve::linear::LinearCurve;
use crate::error::{Error, Result};
use crate::ordinate::{Interval, Ordinate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Mapping {
    /// Maps nothing; projecting through it always fails. Still carries its
    /// own `input_bounds` so that a topology of all-empty mappings can tile
    /// a parent interval (this arises when a `join` finds no downstream
    /// mapping covering part of the upstream domain).
    Empty { input_bounds: Interval },
    /// `y = scale * x + offset`, restricted to `input_bounds`.
    Affine {
        input_bounds: Interval,
        offset: Ordinate,
        scale: Ordinate,
    },
    Linear { curve: LinearCurve },
    Bezier { curve: BezierCurve },
}

impl Mapping {
    pub fn identity(bounds: Interval) -> Mapping {
        Mapping::Affine {
            input_bounds: bounds,
            offset: Ordinate::ZERO,
            scale: Ordinate(1.0),
        }
    }

    pub fn affine(bounds: Interval, offset: Ordinate, scale: Ordinate) -> Mapping {
        Mapping::Affine {
            input_bounds: bounds,
            offset,
            scale,
        }
    }

    pub fn input_bounds(&self) -> Interval {
        match self {
            Mapping::Empty { input_bounds } => *input_bounds,
            Mapping::Affine { input_bounds, .. } => *input_bounds,
            Mapping::Linear { curve } => curve
                .input_bounds()
                .unwrap_or_else(|| Interval::from_f64(0.0, 0.0)),
            Mapping::Bezier { curve } => curve
                .input_bounds()
                .unwrap_or_else(|| Interval::from_f64(0.0, 0.0)),
        }
    }

    /// Output range of this mapping, evaluated at its sampled extrema. For
    /// affine mappings this is exact; for linear it is exact at the knots;
    /// for Bezier it is a dense-sampled approximation (see
    /// [`crate::curve::bezier::BezierCurve::linearize`]).
    pub fn output_bounds(&self, cfg: &Config) -> Result<Interval> {
        match self {
            Mapping::Empty { input_bounds } => Ok(Interval::from_f64(input_bounds.start.value(), input_bounds.start.value())),
            Mapping::Affine {
                input_bounds,
                offset,
                scale,
            } => {
                let a = *scale * input_bounds.start + *offset;
                let b = *scale * input_bounds.end + *offset;
                Ok(Interval::new(a.min(b), a.max(b)))
            }
            Mapping::Linear { curve } => Ok(curve
                .output_bounds()
                .unwrap_or_else(|| Interval::from_f64(0.0, 0.0))),
            Mapping::Bezier { curve } => {
                let lin = curve.linearize(cfg)?;
                Ok(lin
                    .output_bounds()
                    .unwrap_or_else(|| Interval::from_f64(0.0, 0.0)))
            }
        }
    }

    pub fn output_at_input(&self, x: Ordinate, cfg: &Config) -> Result<Ordinate> {
        match self {
            Mapping::Empty { .. } => Err(Error::empty_topology("projecting through an empty mapping")),
            Mapping::Affine {
                input_bounds,
                offset,
                scale,
            } => {
                // Half-open, except the closed upper endpoint: when this is
                // the final mapping of a topology, `Topology::project_ordinate`
                // deliberately selects it for `x == input_bounds.end` (see
                // `Topology::mapping_for_ordinate`), so the mapping itself must
                // accept that point rather than bouncing it back as an error.
                let at_closed_upper_bound = x.value() == input_bounds.end.value();
                if !input_bounds.contains(x) && !at_closed_upper_bound {
                    return Err(Error::out_of_bounds(format!(
                        "input {} outside affine mapping bounds",
                        x.value()
                    )));
                }
                Ok(*scale * x + *offset)
            }
            Mapping::Linear { curve } => curve.output_at_input(x),
            Mapping::Bezier { curve } => curve.output_at_input(x, cfg),
        }
    }

    /// Every input value within this mapping's domain whose output is `y`.
    /// Used during [`crate::topology::Topology::join`] to locate the exact
    /// split points where the downstream mapping changes.
    pub fn preimages_of_ordinate(&self, y: Ordinate, cfg: &Config) -> Vec<Ordinate> {
        match self {
            Mapping::Empty { .. } => Vec::new(),
            Mapping::Affine {
                input_bounds,
                offset,
                scale,
            } => {
                if scale.value().abs() < f64::EPSILON {
                    return Vec::new();
                }
                let x = Ordinate((y.value() - offset.value()) / scale.value());
                if input_bounds.start.value() <= x.value() && x.value() <= input_bounds.end.value()
                {
                    vec![x]
                } else {
                    Vec::new()
                }
            }
            Mapping::Linear { curve } => curve
                .preimages_of_output(y.value())
                .into_iter()
                .map(Ordinate)
                .collect(),
            Mapping::Bezier { curve } => curve
                .preimages_of_output(y.value(), cfg)
                .into_iter()
                .map(Ordinate)
                .collect(),
        }
    }

    /// The inverse mapping (swap input/output roles). Used when a path query
    /// through the composition tree walks from a child space up to a parent
    /// space — the node-owned transforms in [`crate::tree`] are all defined
    /// parent-to-child, so the upward leg of a path inverts them.
    ///
    /// For `Linear`/`Bezier` this swaps `in` and `out` on every control point
    /// and re-sorts by the new `in`; valid because these curves are
    /// parametric (the underlying polynomial does not care which axis is
    /// labeled input).
    pub fn inverse(&self) -> Result<Mapping> {
        match self {
            Mapping::Empty { input_bounds } => Ok(Mapping::Empty {
                input_bounds: *input_bounds,
            }),
            Mapping::Affine {
                input_bounds,
                offset,
                scale,
            } => {
                if scale.value().abs() < f64::EPSILON {
                    return Err(Error::div_by_zero(
                        "cannot invert an affine mapping with zero scale",
                    ));
                }
                let out_a = *scale * input_bounds.start + *offset;
                let out_b = *scale * input_bounds.end + *offset;
                let new_bounds = Interval::new(out_a.min(out_b), out_a.max(out_b));
                Ok(Mapping::Affine {
                    input_bounds: new_bounds,
                    offset: Ordinate(-offset.value() / scale.value()),
                    scale: Ordinate(1.0 / scale.value()),
                })
            }
            Mapping::Linear { curve } => {
                let mut knots: Vec<ControlPoint> = curve
                    .knots()
                    .iter()
                    .map(|k| ControlPoint::new(k.out.value(), k.r#in.value()))
                    .collect();
                knots.sort_by(|a, b| a.r#in.value().partial_cmp(&b.r#in.value()).unwrap());
                Ok(Mapping::Linear {
                    curve: LinearCurve::new(knots)?,
                })
            }
            Mapping::Bezier { curve } => {
                let swap = |cp: &ControlPoint| ControlPoint::new(cp.out.value(), cp.r#in.value());
                let mut segs: Vec<BezierSegment> = curve
                    .segments()
                    .iter()
                    .map(|s| BezierSegment::new(swap(&s.p0), swap(&s.p1), swap(&s.p2), swap(&s.p3)))
                    .collect();
                segs.sort_by(|a, b| a.p0.r#in.value().partial_cmp(&b.p0.r#in.value()).unwrap());
                Ok(Mapping::Bezier {
                    curve: BezierCurve::new(segs)?,
                })
            }
        }
    }

    /// `true` for affine mappings with non-negative scale, for linear curves
    /// whose knots' `out` is non-decreasing, and (approximately, via dense
    /// sampling) for Bezier curves. `Empty` is vacuously monotonic.
    pub fn is_monotonic_non_decreasing(&self, cfg: &Config) -> bool {
        match self {
            Mapping::Empty { .. } => true,
            Mapping::Affine { scale, .. } => scale.value() >= 0.0,
            Mapping::Linear { curve } => curve
                .knots()
                .windows(2)
                .all(|w| w[1].out.value() >= w[0].out.value()),
            Mapping::Bezier { curve } => curve
                .linearize(cfg)
                .map(|lin| {
                    lin.knots()
                        .windows(2)
                        .all(|w| w[1].out.value() >= w[0].out.value())
                })
                .unwrap_or(false),
        }
    }
}
