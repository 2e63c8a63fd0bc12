#![allow(dead_code)]
//! Piecewise-linear curve: an ordered knot sequence, strictly increasing in
//! `in`. Output is linear between consecutive knots and need not be monotonic
//! (reverse warps are expressed as a linear curve whose `out` values descend
//! across ascending `in` knots).

use crate::curve::control_point::ControlPoint;
use crate::error::{Error, Result};
use crate::ordinate::{Interval, Ordinate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinearCurve {
    knots: Vec<ControlPoint>,
}

impl LinearCurve {
    /// Build a linear curve from knots, validating strictly increasing `in`.
    pub fn new(knots: Vec<ControlPoint>) -> Result<Self> {
        for w in knots.windows(2) {
            if w[1].r#in.value() <= w[0].r#in.value() {
                return Err(Error::non_monotonic_input(
                    "LinearCurve requires strictly increasing knot `in` values",
                ));
            }
        }
        Ok(LinearCurve { knots })
    }

    pub fn knots(&self) -> &[ControlPoint] {
        &self.knots
    }

    pub fn is_empty(&self) -> bool {
        self.knots.len() < 2
    }

    /// Input bounds `[first.in, last.in)`. `None` if fewer than two knots.
    pub fn input_bounds(&self) -> Option<Interval> {
        if self.knots.len() < 2 {
            return None;
        }
        Some(Interval::new(
            self.knots[0].r#in,
            self.knots[self.knots.len() - 1].r#in,
        ))
    }

    /// Output range spanned by the curve (min/max of all knot `out`s, not
    /// necessarily in knot order since the curve may be reversed).
    pub fn output_bounds(&self) -> Option<Interval> {
        if self.knots.is_empty() {
            return None;
        }
        let mut lo = self.knots[0].out;
        let mut hi = self.knots[0].out;
        for k in &self.knots[1..] {
            lo = lo.min(k.out);
            hi = hi.max(k.out);
        }
        Some(Interval::new(lo, hi))
    }

    /// Every input value whose output is `y`, scanning every knot segment
    /// independently (a two-knot segment is always monotonic in `out`, even
    /// if the overall curve reverses direction across segments).
    pub fn preimages_of_output(&self, y: f64) -> Vec<f64> {
        let mut out = Vec::new();
        for w in self.knots.windows(2) {
            let (a, b) = (w[0], w[1]);
            let lo = a.out.value().min(b.out.value());
            let hi = a.out.value().max(b.out.value());
            if y < lo || y > hi {
                continue;
            }
            let span = b.out.value() - a.out.value();
            if span.abs() < f64::EPSILON {
                continue;
            }
            let t = (y - a.out.value()) / span;
            out.push(a.r#in.value() + t * (b.r#in.value() - a.r#in.value()));
        }
        out
    }

    /// The knots of this curve restricted to `[lo, hi]`, interpolating fresh
    /// control points at the boundaries when they don't land exactly on an
    /// existing knot. Always returns independently-owned data.
    pub fn sub_knots(&self, lo: f64, hi: f64) -> Result<Vec<ControlPoint>> {
        let mut out = Vec::new();
        let start = self.output_at_input(Ordinate(lo)).unwrap_or_else(|_| {
            // lo may equal the curve's final knot (closed upper bound).
            self.knots[self.knots.len() - 1].out
        });
        out.push(ControlPoint::new(lo, start.value()));
        for k in &self.knots {
            if k.r#in.value() > lo && k.r#in.value() < hi {
                out.push(*k);
            }
        }
        let end = if (hi - self.knots[self.knots.len() - 1].r#in.value()).abs() < 1e-12 {
            self.knots[self.knots.len() - 1].out
        } else {
            self.output_at_input(Ordinate(hi))?
        };
        out.push(ControlPoint::new(hi, end.value()));
        Ok(out)
    }

    fn segment_index_for_input(&self, x: Ordinate) -> Option<usize> {
        if self.knots.len() < 2 {
            return None;
        }
        let n = self.knots.len();
        let hi = self.knots[n - 1].r#in.value();
        if x.value() < self.knots[0].r#in.value() || x.value() > hi {
            return None;
        }
        // Half-open bracket search: segment i covers [knots[i].in, knots[i+1].in),
        // except the curve's own closed upper endpoint, which belongs to the
        // last segment (mirrors `Topology::mapping_for_ordinate`'s inclusive-
        // last-mapping rule, since a `Linear` mapping is often a topology's
        // final mapping).
        if x.value() == hi {
            return Some(n - 2);
        }
        for i in 0..n - 1 {
            if x.value() >= self.knots[i].r#in.value() && x.value() < self.knots[i + 1].r#in.value()
            {
                return Some(i);
            }
        }
        None
    }

    /// Linear interpolation of `out` at input `x`.
    pub fn output_at_input(&self, x: Ordinate) -> Result<Ordinate> {
        let i = self.segment_index_for_input(x).ok_or_else(|| {
            Error::out_of_bounds(format!("input {} outside LinearCurve bounds", x.value()))
        })?;
        let (a, b) = (self.knots[i], self.knots[i + 1]);
        let span = b.r#in.value() - a.r#in.value();
        let t = if span.abs() < f64::EPSILON {
            0.0
        } else {
            (x.value() - a.r#in.value()) / span
        };
        Ok(Ordinate(a.out.value() + t * (b.out.value() - a.out.value())))
    }

    /// Insert knots at every input `x` such that `output(x) == y` for any `y`
    /// in `ys`, returning a new, independently-owned curve (never sharing
    /// storage with `self`).
    pub fn split_at_each_output_ordinate(&self, ys: &[Ordinate]) -> Result<LinearCurve> {
        let mut new_knots: Vec<ControlPoint> = Vec::with_capacity(self.knots.len() + ys.len());
        if self.knots.is_empty() {
            return Ok(LinearCurve {
                knots: new_knots,
            });
        }
        new_knots.push(self.knots[0]);
        for w in self.knots.windows(2) {
            let (a, b) = (w[0], w[1]);
            let out_lo = a.out.value().min(b.out.value());
            let out_hi = a.out.value().max(b.out.value());
            let mut crossing: Vec<ControlPoint> = ys
                .iter()
                .filter(|y| y.value() > out_lo && y.value() < out_hi)
                .map(|y| {
                    let t = (y.value() - a.out.value()) / (b.out.value() - a.out.value());
                    ControlPoint::new(a.r#in.value() + t * (b.r#in.value() - a.r#in.value()), y.value())
                })
                .collect();
            crossing.sort_by(|p, q| p.r#in.value().partial_cmp(&q.r#in.value()).unwrap());
            new_knots.extend(crossing);
            new_knots.push(b);
        }
        LinearCurve::new(new_knots)
    }
}
