#![allow(dead_code)]
//! An ordered tiling of Mappings over a single contiguous input interval, and
//! the `join` operation that composes two Topologies end-to-end.

use crate::config::Config;
use crate::curve::bezier::BezierSegment;
use crate::curve::control_point::ControlPoint;
use crate::curve::linear::LinearCurve;
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::ordinate::{Interval, Ordinate};
use serde::{Deserialize, Serialize};

/// An ordered sequence of [`Mapping`]s whose input intervals tile a single
/// contiguous parent interval without gap or overlap. An empty topology
/// (no mappings) is permitted and represents the absence of any transform.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Topology {
    mappings: Vec<Mapping>,
}

impl Topology {
    /// Build a topology, validating that consecutive mappings abut exactly
    /// (mapping `i`'s input-bounds end equals mapping `i+1`'s input-bounds
    /// start).
    pub fn new(mappings: Vec<Mapping>) -> Result<Self> {
        for w in mappings.windows(2) {
            let a_end = w[0].input_bounds().end.value();
            let b_start = w[1].input_bounds().start.value();
            if (a_end - b_start).abs() > 1e-9 {
                return Err(Error::non_monotonic_input(format!(
                    "Topology mappings must tile without gap or overlap: {a_end} != {b_start}"
                )));
            }
        }
        Ok(Topology { mappings })
    }

    pub fn empty() -> Self {
        Topology { mappings: Vec::new() }
    }

    /// An identity topology over `bounds`: a single affine mapping with
    /// `scale = 1`, `offset = 0`.
    pub fn identity(bounds: Interval) -> Self {
        Topology {
            mappings: vec![Mapping::identity(bounds)],
        }
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Ascending list of `N + 1` cut points for `N` mappings.
    pub fn cut_points(&self) -> Vec<Ordinate> {
        if self.mappings.is_empty() {
            return Vec::new();
        }
        let mut pts = Vec::with_capacity(self.mappings.len() + 1);
        pts.push(self.mappings[0].input_bounds().start);
        for m in &self.mappings {
            pts.push(m.input_bounds().end);
        }
        pts
    }

    pub fn input_bounds(&self) -> Option<Interval> {
        if self.mappings.is_empty() {
            return None;
        }
        Some(Interval::new(
            self.mappings[0].input_bounds().start,
            self.mappings[self.mappings.len() - 1].input_bounds().end,
        ))
    }

    /// Union of every mapping's output range.
    pub fn output_bounds(&self, cfg: &Config) -> Result<Option<Interval>> {
        if self.mappings.is_empty() {
            return Ok(None);
        }
        let mut lo = Ordinate(f64::INFINITY);
        let mut hi = Ordinate(f64::NEG_INFINITY);
        for m in &self.mappings {
            let b = m.output_bounds(cfg)?;
            lo = lo.min(b.start);
            hi = hi.max(b.end);
        }
        Ok(Some(Interval::new(lo, hi)))
    }

    fn mapping_for_ordinate(&self, t: Ordinate) -> Option<(usize, &Mapping)> {
        let n = self.mappings.len();
        for (i, m) in self.mappings.iter().enumerate() {
            let b = m.input_bounds();
            let is_last = i + 1 == n;
            if t.value() >= b.start.value() && (t.value() < b.end.value() || (is_last && t.value() <= b.end.value()))
            {
                return Some((i, m));
            }
        }
        None
    }

    /// Project an ordinate through this topology. Selects the mapping whose
    /// sub-interval contains `t` (half-open; the upper boundary belongs to
    /// the next mapping).
    pub fn project_ordinate(&self, t: Ordinate, cfg: &Config) -> Result<Ordinate> {
        let (_, m) = self.mapping_for_ordinate(t).ok_or_else(|| {
            Error::out_of_bounds(format!("ordinate {} outside topology bounds", t.value()))
        })?;
        m.output_at_input(t, cfg)
    }

    /// Return a single `linear` topology whose knots sample each underlying
    /// mapping at its breakpoints, plus one knot per Bezier critical point.
    pub fn linearize(&self, cfg: &Config) -> Result<Topology> {
        if self.mappings.is_empty() {
            return Ok(Topology::empty());
        }
        let mut knots: Vec<ControlPoint> = Vec::new();
        for m in &self.mappings {
            let b = m.input_bounds();
            match m {
                Mapping::Empty { .. } => {}
                Mapping::Affine { offset, scale, .. } => {
                    push_knot(&mut knots, b.start.value(), (*scale * b.start + *offset).value());
                    push_knot(&mut knots, b.end.value(), (*scale * b.end + *offset).value());
                }
                Mapping::Linear { curve } => {
                    for k in curve.knots() {
                        push_knot(&mut knots, k.r#in.value(), k.out.value());
                    }
                }
                Mapping::Bezier { curve } => {
                    let split = curve.split_on_critical_points(cfg);
                    let lin = split.linearize(cfg)?;
                    for k in lin.knots() {
                        push_knot(&mut knots, k.r#in.value(), k.out.value());
                    }
                }
            }
        }
        let curve = LinearCurve::new(knots)?;
        Ok(Topology {
            mappings: vec![Mapping::Linear { curve }],
        })
    }

    /// The inverse topology: invert each mapping and re-sort by the new
    /// (output-derived) input bounds. Used for the upward leg of a
    /// [`crate::topo_map::TopologicalMap`] path query.
    pub fn inverse(&self) -> Result<Topology> {
        let mut inv: Vec<Mapping> = self
            .mappings
            .iter()
            .map(|m| m.inverse())
            .collect::<Result<_>>()?;
        inv.sort_by(|a, b| {
            a.input_bounds()
                .start
                .value()
                .partial_cmp(&b.input_bounds().start.value())
                .unwrap()
        });
        Topology::new(inv)
    }

    /// Compose `a2b` with `b2c`, producing `a2c`. For each mapping in `a2b`,
    /// the portion of its input interval whose image falls outside `b2c`'s
    /// input bounds becomes an `empty` mapping in the result (the result
    /// Topology still tiles `a2b`'s full input domain).
    pub fn join(a2b: &Topology, b2c: &Topology, cfg: &Config) -> Result<Topology> {
        if a2b.is_empty() || b2c.is_empty() {
            return Ok(Topology::empty());
        }
        let b_cuts = b2c.cut_points();
        let mut out_mappings = Vec::new();
        for m in &a2b.mappings {
            let b = m.input_bounds();
            let (a_lo, a_hi) = (b.start.value(), b.end.value());

            let mut splits: Vec<f64> = vec![a_lo, a_hi];
            for cut in &b_cuts {
                for x in m.preimages_of_ordinate(*cut, cfg) {
                    if x.value() > a_lo + 1e-12 && x.value() < a_hi - 1e-12 {
                        splits.push(x.value());
                    }
                }
            }
            splits.sort_by(|p, q| p.partial_cmp(q).unwrap());
            splits.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

            for w in splits.windows(2) {
                let (x0, x1) = (w[0], w[1]);
                out_mappings.push(join_sub_interval(m, b2c, x0, x1, cfg)?);
            }
        }
        Topology::new(out_mappings)
    }
}

fn push_knot(knots: &mut Vec<ControlPoint>, input: f64, output: f64) {
    if let Some(last) = knots.last() {
        if input <= last.r#in.value() {
            return;
        }
    }
    knots.push(ControlPoint::new(input, output));
}

/// Compose `m` (from `a2b`) with whichever single mapping of `b2c` covers the
/// image of `[x0, x1)`, producing one mapping over `[x0, x1)` in the result.
fn join_sub_interval(m: &Mapping, b2c: &Topology, x0: f64, x1: f64, cfg: &Config) -> Result<Mapping> {
    let xm = 0.5 * (x0 + x1);
    let ym = match m.output_at_input(Ordinate(xm), cfg) {
        Ok(y) => y,
        Err(_) => return Ok(empty_over(x0, x1)),
    };
    let n = match b2c.mapping_for_ordinate(ym) {
        Some((_, n)) => n,
        None => return Ok(empty_over(x0, x1)),
    };
    compose_pair(m, n, x0, x1, cfg)
}

fn empty_over(x0: f64, x1: f64) -> Mapping {
    Mapping::Empty {
        input_bounds: Interval::from_f64(x0, x1),
    }
}

fn compose_pair(m: &Mapping, n: &Mapping, x0: f64, x1: f64, cfg: &Config) -> Result<Mapping> {
    use Mapping::*;
    let bounds = Interval::from_f64(x0, x1);
    match (m, n) {
        (Empty { .. }, _) | (_, Empty { .. }) => Ok(empty_over(x0, x1)),

        (
            Affine {
                offset: o1,
                scale: s1,
                ..
            },
            Affine {
                offset: o2,
                scale: s2,
                ..
            },
        ) => Ok(Mapping::Affine {
            input_bounds: bounds,
            offset: *s2 * *o1 + *o2,
            scale: *s2 * *s1,
        }),

        (
            Affine {
                offset: o1,
                scale: s1,
                ..
            },
            Linear { curve: n_curve },
        ) => {
            let mut new_knots: Vec<ControlPoint> = n_curve
                .knots()
                .iter()
                .map(|k| {
                    let x = (k.r#in.value() - o1.value()) / s1.value();
                    ControlPoint::new(x, k.out.value())
                })
                .collect();
            new_knots.sort_by(|a, b| a.r#in.value().partial_cmp(&b.r#in.value()).unwrap());
            Ok(Mapping::Linear {
                curve: LinearCurve::new(new_knots)?,
            })
        }

        (
            Affine {
                offset: o1,
                scale: s1,
                ..
            },
            Bezier { curve: n_curve },
        ) => {
            let segs: Result<Vec<BezierSegment>> = n_curve
                .segments()
                .iter()
                .map(|s| {
                    let xform = |cp: &ControlPoint| {
                        ControlPoint::new((cp.r#in.value() - o1.value()) / s1.value(), cp.out.value())
                    };
                    let (p0, p1, p2, p3) = (xform(&s.p0), xform(&s.p1), xform(&s.p2), xform(&s.p3));
                    if s1.value() < 0.0 {
                        Ok(BezierSegment::new(p3, p2, p1, p0))
                    } else {
                        Ok(BezierSegment::new(p0, p1, p2, p3))
                    }
                })
                .collect();
            let mut segs = segs?;
            if s1.value() < 0.0 {
                segs.reverse();
            }
            Ok(Mapping::Bezier {
                curve: crate::curve::bezier::BezierCurve::new(segs)?,
            })
        }

        (Linear { curve: m_curve }, Affine { offset: o2, scale: s2, .. }) => {
            let sub = m_curve.sub_knots(x0, x1)?;
            let new_knots: Vec<ControlPoint> = sub
                .iter()
                .map(|k| ControlPoint::new(k.r#in.value(), (*s2 * k.out + *o2).value()))
                .collect();
            Ok(Mapping::Linear {
                curve: LinearCurve::new(new_knots)?,
            })
        }

        (Linear { curve: m_curve }, Linear { .. }) | (Linear { curve: m_curve }, Bezier { .. }) => {
            let sub = m_curve.sub_knots(x0, x1)?;
            let mut new_knots = Vec::with_capacity(sub.len());
            for k in &sub {
                let out = n.output_at_input(k.out, cfg)?;
                new_knots.push(ControlPoint::new(k.r#in.value(), out.value()));
            }
            Ok(Mapping::Linear {
                curve: LinearCurve::new(new_knots)?,
            })
        }

        (Bezier { .. }, _) => {
            // Bezier composed with anything linearizes through the
            // downstream mapping by dense resampling.
            let samples = cfg.linearization_samples_per_segment.max(2);
            let mut new_knots = Vec::with_capacity(samples as usize + 1);
            for i in 0..=samples {
                let t = x0 + (x1 - x0) * (i as f64 / samples as f64);
                let y = m.output_at_input(Ordinate(t), cfg)?;
                let out = n.output_at_input(y, cfg)?;
                push_knot(&mut new_knots, t, out.value());
            }
            Ok(Mapping::Linear {
                curve: LinearCurve::new(new_knots)?,
            })
        }
    }
}
