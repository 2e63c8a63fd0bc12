#![allow(dead_code)]
//! Piecewise cubic Bezier curves: evaluation, find-u (Newton-Raphson seeded
//! by a bisection bracket), hodograph-based critical-point splitting, and
//! linearization.

use crate::config::Config;
use crate::curve::control_point::ControlPoint;
use crate::curve::linear::LinearCurve;
use crate::error::{Error, Result};
use crate::ordinate::{Interval, Ordinate};
use serde::{Deserialize, Serialize};

/// Four control points `p0..p3`. Monotonic in input if
/// `p0.in <= p1.in <= p2.in <= p3.in`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BezierSegment {
    pub p0: ControlPoint,
    pub p1: ControlPoint,
    pub p2: ControlPoint,
    pub p3: ControlPoint,
}

#[inline]
fn cubic(p0: f64, p1: f64, p2: f64, p3: f64, u: f64) -> f64 {
    let mu = 1.0 - u;
    mu * mu * mu * p0 + 3.0 * mu * mu * u * p1 + 3.0 * mu * u * u * p2 + u * u * u * p3
}

#[inline]
fn quadratic(q0: f64, q1: f64, q2: f64, u: f64) -> f64 {
    let mu = 1.0 - u;
    mu * mu * q0 + 2.0 * mu * u * q1 + u * u * q2
}

#[inline]
fn lerp_cp(a: ControlPoint, b: ControlPoint, t: f64) -> ControlPoint {
    a + (b - a).scale(t)
}

impl BezierSegment {
    pub fn new(p0: ControlPoint, p1: ControlPoint, p2: ControlPoint, p3: ControlPoint) -> Self {
        BezierSegment { p0, p1, p2, p3 }
    }

    pub fn is_input_monotonic(&self) -> bool {
        self.p0.r#in.value() <= self.p1.r#in.value()
            && self.p1.r#in.value() <= self.p2.r#in.value()
            && self.p2.r#in.value() <= self.p3.r#in.value()
    }

    pub fn input_bounds(&self) -> Interval {
        Interval::new(self.p0.r#in, self.p3.r#in)
    }

    #[inline]
    fn eval_in(&self, u: f64) -> f64 {
        cubic(
            self.p0.r#in.value(),
            self.p1.r#in.value(),
            self.p2.r#in.value(),
            self.p3.r#in.value(),
            u,
        )
    }

    #[inline]
    fn eval_out(&self, u: f64) -> f64 {
        cubic(
            self.p0.out.value(),
            self.p1.out.value(),
            self.p2.out.value(),
            self.p3.out.value(),
            u,
        )
    }

    /// Evaluate the curve at parameter `u in [0,1]`.
    pub fn eval(&self, u: f64) -> ControlPoint {
        ControlPoint::new(self.eval_in(u), self.eval_out(u))
    }

    /// The quadratic-Bezier hodograph (derivative curve). Each component's
    /// control points are `3*(p_{i+1} - p_i)`.
    pub fn hodograph(&self) -> (f64, f64, f64, f64, f64, f64) {
        let in_q0 = 3.0 * (self.p1.r#in.value() - self.p0.r#in.value());
        let in_q1 = 3.0 * (self.p2.r#in.value() - self.p1.r#in.value());
        let in_q2 = 3.0 * (self.p3.r#in.value() - self.p2.r#in.value());
        let out_q0 = 3.0 * (self.p1.out.value() - self.p0.out.value());
        let out_q1 = 3.0 * (self.p2.out.value() - self.p1.out.value());
        let out_q2 = 3.0 * (self.p3.out.value() - self.p2.out.value());
        (in_q0, in_q1, in_q2, out_q0, out_q1, out_q2)
    }

    #[inline]
    fn din_du(&self, u: f64) -> f64 {
        let (q0, q1, q2, ..) = self.hodograph();
        quadratic(q0, q1, q2, u)
    }

    #[inline]
    fn dout_du(&self, u: f64) -> f64 {
        let (.., q0, q1, q2) = self.hodograph();
        quadratic(q0, q1, q2, u)
    }

    /// Find the parameter `u` such that `eval_out(u) == y`, via the same
    /// Newton-safeguarded-by-bisection scheme as [`find_u`](Self::find_u),
    /// but on the output component. Used by [`crate::mapping::Mapping`]'s
    /// preimage search during [`crate::topology::Topology::join`]; unlike
    /// `find_u` this does not assume output-monotonicity of the whole
    /// segment; it converges only within the bracket that happens to
    /// contain a root, if any.
    pub fn find_u_for_output(&self, y: f64, cfg: &Config) -> Option<f64> {
        let lo_out = self.p0.out.value();
        let hi_out = self.p3.out.value();
        let (range_lo, range_hi) = (lo_out.min(hi_out), lo_out.max(hi_out));
        if y < range_lo - cfg.root_epsilon || y > range_hi + cfg.root_epsilon {
            return None;
        }
        let mut lo = 0.0f64;
        let mut hi = 1.0f64;
        let increasing = hi_out >= lo_out;
        let mut u = 0.5f64;
        for _ in 0..cfg.newton_max_iterations {
            let f = self.eval_out(u) - y;
            if f.abs() < cfg.newton_epsilon {
                return Some(u.clamp(0.0, 1.0));
            }
            let f_says_increase = if increasing { f < 0.0 } else { f > 0.0 };
            if f_says_increase {
                lo = u;
            } else {
                hi = u;
            }
            let df = self.dout_du(u);
            let candidate = if df.abs() > 1e-12 { u - f / df } else { f64::NAN };
            u = if candidate.is_finite() && candidate > lo && candidate < hi {
                candidate
            } else {
                0.5 * (lo + hi)
            };
        }
        None
    }

    /// Real roots in `(0, 1)` of the hodograph's `in` component — the
    /// critical points where `d(in)/du == 0`.
    pub fn critical_points(&self, eps: f64) -> Vec<f64> {
        let (q0, q1, q2, ..) = self.hodograph();
        let a = q0 - 2.0 * q1 + q2;
        let b = 2.0 * (q1 - q0);
        let c = q0;
        let mut roots = Vec::new();
        if a.abs() < eps {
            if b.abs() > eps {
                let u = -c / b;
                if u > eps && u < 1.0 - eps {
                    roots.push(u);
                }
            }
            return roots;
        }
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return roots;
        }
        let sqrt_disc = disc.sqrt();
        for u in [(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)] {
            if u > eps && u < 1.0 - eps {
                roots.push(u);
            }
        }
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        roots
    }

    /// Subdivide at parameter `t` via de Casteljau's algorithm, returning the
    /// `(left, right)` segments. Each segment owns freshly-allocated control
    /// points (no aliasing with `self`).
    pub fn subdivide(&self, t: f64) -> (BezierSegment, BezierSegment) {
        let p01 = lerp_cp(self.p0, self.p1, t);
        let p12 = lerp_cp(self.p1, self.p2, t);
        let p23 = lerp_cp(self.p2, self.p3, t);
        let p012 = lerp_cp(p01, p12, t);
        let p123 = lerp_cp(p12, p23, t);
        let p0123 = lerp_cp(p012, p123, t);
        (
            BezierSegment::new(self.p0, p01, p012, p0123),
            BezierSegment::new(p0123, p123, p23, self.p3),
        )
    }

    /// Find the parameter `u` such that `eval_in(u) == x`, via Newton-Raphson
    /// on the input polynomial, safeguarded by a bisection bracket. Requires
    /// `self.is_input_monotonic()`.
    pub fn find_u(&self, x: f64, cfg: &Config, segment_index: usize) -> Result<f64> {
        let lo_in = self.p0.r#in.value();
        let hi_in = self.p3.r#in.value();
        if x < lo_in - cfg.root_epsilon || x > hi_in + cfg.root_epsilon {
            return Err(Error::out_of_bounds(format!(
                "input {x} outside segment {segment_index} bounds [{lo_in}, {hi_in}]"
            )));
        }
        let mut lo = 0.0f64;
        let mut hi = 1.0f64;
        let mut u = if (hi_in - lo_in).abs() < f64::EPSILON {
            0.5
        } else {
            ((x - lo_in) / (hi_in - lo_in)).clamp(0.0, 1.0)
        };
        for _ in 0..cfg.newton_max_iterations {
            let f = self.eval_in(u) - x;
            if f.abs() < cfg.newton_epsilon {
                return Ok(u.clamp(0.0, 1.0));
            }
            if f > 0.0 {
                hi = u;
            } else {
                lo = u;
            }
            let df = self.din_du(u);
            let candidate = if df.abs() > 1e-12 {
                u - f / df
            } else {
                f64::NAN
            };
            log::trace!("find_u segment={segment_index} u={u} f={f} candidate={candidate}");
            u = if candidate.is_finite() && candidate > lo && candidate < hi {
                candidate
            } else {
                0.5 * (lo + hi)
            };
        }
        Err(Error::FindUDiverged {
            segment_index,
            input: x,
        })
    }

    /// Evaluate `out` at input `x` by finding `u` then evaluating `eval_out`.
    pub fn output_at_input(&self, x: f64, cfg: &Config, segment_index: usize) -> Result<f64> {
        let u = self.find_u(x, cfg, segment_index)?;
        Ok(self.eval_out(u))
    }

    /// Synthesize a cubic Bezier segment from `start`/`end` (fixed as `p0`/
    /// `p3`) that passes through `mid` at `u=0.5` with derivative (w.r.t. `u`)
    /// `tangent_at_mid` there. Closed-form solve of the two linear
    /// constraints `B(0.5) == mid` and `B'(0.5) == tangent_at_mid`.
    pub fn three_point_approximation(
        start: ControlPoint,
        mid: ControlPoint,
        end: ControlPoint,
        tangent_at_mid: ControlPoint,
    ) -> BezierSegment {
        let s = mid.scale(8.0 / 3.0) - (start + end).scale(1.0 / 3.0);
        let d = tangent_at_mid.scale(4.0 / 3.0) - (end - start);
        let p2 = (s + d).scale(0.5);
        let p1 = (s - d).scale(0.5);
        BezierSegment::new(start, p1, p2, end)
    }
}

/// An ordered sequence of Bezier segments with `segment[i].p3 ==
/// segment[i+1].p0`. Input-monotonic as a whole.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BezierCurve {
    segments: Vec<BezierSegment>,
}

impl BezierCurve {
    pub fn new(segments: Vec<BezierSegment>) -> Result<Self> {
        for s in &segments {
            if !s.is_input_monotonic() {
                return Err(Error::non_monotonic_input(
                    "BezierCurve segment is not input-monotonic",
                ));
            }
        }
        for w in segments.windows(2) {
            if w[0].p3 != w[1].p0 {
                return Err(Error::non_monotonic_input(
                    "BezierCurve segments must share endpoints (segment[i].p3 == segment[i+1].p0)",
                ));
            }
        }
        Ok(BezierCurve { segments })
    }

    pub fn segments(&self) -> &[BezierSegment] {
        &self.segments
    }

    pub fn input_bounds(&self) -> Option<Interval> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Interval::new(
            self.segments[0].p0.r#in,
            self.segments[self.segments.len() - 1].p3.r#in,
        ))
    }

    fn segment_for_input(&self, x: f64) -> Option<(usize, &BezierSegment)> {
        for (i, s) in self.segments.iter().enumerate() {
            let lo = s.p0.r#in.value();
            let hi = s.p3.r#in.value();
            let is_last = i + 1 == self.segments.len();
            if x >= lo && (x < hi || (is_last && x <= hi)) {
                return Some((i, s));
            }
        }
        None
    }

    /// Every input value whose output is `y`, across all segments. Used to
    /// locate split points when joining through a Bezier mapping.
    pub fn preimages_of_output(&self, y: f64, cfg: &Config) -> Vec<f64> {
        self.segments
            .iter()
            .filter_map(|s| s.find_u_for_output(y, cfg).map(|u| s.eval(u).r#in.value()))
            .collect()
    }

    pub fn output_at_input(&self, x: Ordinate, cfg: &Config) -> Result<Ordinate> {
        let (i, seg) = self.segment_for_input(x.value()).ok_or_else(|| {
            Error::out_of_bounds(format!("input {} outside BezierCurve bounds", x.value()))
        })?;
        Ok(Ordinate(seg.output_at_input(x.value(), cfg, i)?))
    }

    /// Insert breakpoints at every segment's hodograph-`in` critical point so
    /// that every resulting segment is strictly input-monotonic. Value is
    /// preserved: the resampled curve equals the original at every input.
    pub fn split_on_critical_points(&self, cfg: &Config) -> BezierCurve {
        let mut out = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            let roots = seg.critical_points(cfg.root_epsilon);
            if roots.is_empty() {
                out.push(*seg);
                continue;
            }
            let mut remaining = *seg;
            let mut prev_t = 0.0;
            for &t in &roots {
                // t is in the original [0,1] parameterization; remap to the
                // remaining sub-segment's local parameterization.
                let local_t = (t - prev_t) / (1.0 - prev_t);
                let (left, right) = remaining.subdivide(local_t.clamp(0.0, 1.0));
                out.push(left);
                remaining = right;
                prev_t = t;
            }
            out.push(remaining);
        }
        BezierCurve { segments: out }
    }

    /// Convert to a [`LinearCurve`] by sampling each segment at fixed
    /// parameter increments, always including both segment endpoints.
    pub fn linearize(&self, cfg: &Config) -> Result<LinearCurve> {
        let samples = cfg.linearization_samples_per_segment.max(1);
        let mut knots = Vec::new();
        for seg in &self.segments {
            for i in 0..=samples {
                let u = i as f64 / samples as f64;
                let cp = seg.eval(u);
                if let Some(last) = knots.last() {
                    let last_in: &ControlPoint = last;
                    if cp.r#in.value() <= last_in.r#in.value() {
                        continue;
                    }
                }
                knots.push(cp);
            }
        }
        LinearCurve::new(knots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(i: f64, o: f64) -> ControlPoint {
        ControlPoint::new(i, o)
    }

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn identity_segment_round_trips() {
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(1.0 / 3.0, 1.0 / 3.0), cp(2.0 / 3.0, 2.0 / 3.0), cp(1.0, 1.0));
        let y = seg.output_at_input(0.5, &cfg(), 0).unwrap();
        assert!((y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_curve_monotonic_find_u() {
        // Standard ease-in-out: (0,0) (0.42,0) (0.58,1) (1,1)
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(0.42, 0.0), cp(0.58, 1.0), cp(1.0, 1.0));
        assert!(seg.is_input_monotonic());
        let y0 = seg.output_at_input(0.0, &cfg(), 0).unwrap();
        let y1 = seg.output_at_input(1.0, &cfg(), 0).unwrap();
        assert!((y0 - 0.0).abs() < 1e-6);
        assert!((y1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn subdivide_preserves_endpoints() {
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(0.3, 0.1), cp(0.7, 0.9), cp(1.0, 1.0));
        let (left, right) = seg.subdivide(0.5);
        assert_eq!(left.p0, seg.p0);
        assert_eq!(right.p3, seg.p3);
        assert_eq!(left.p3, right.p0);
    }

    #[test]
    fn split_on_critical_points_preserves_value() {
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(2.0, 1.0), cp(-1.0, 2.0), cp(3.0, 3.0));
        let curve = BezierCurve {
            segments: vec![seg],
        };
        let split = curve.split_on_critical_points(&cfg());
        assert!(!split.segments().is_empty());
        // every resulting segment must be input-monotonic
        for s in split.segments() {
            assert!(s.is_input_monotonic());
        }
    }

    #[test]
    fn three_point_approximation_interpolates() {
        let start = cp(0.0, 0.0);
        let mid = cp(0.5, 0.6);
        let end = cp(1.0, 1.0);
        let tangent = cp(1.0, 0.4);
        let seg = BezierSegment::three_point_approximation(start, mid, end, tangent);
        let m = seg.eval(0.5);
        assert!((m.r#in.value() - mid.r#in.value()).abs() < 1e-9);
        assert!((m.out.value() - mid.out.value()).abs() < 1e-9);
    }

    #[test]
    fn linearize_converges() {
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(0.42, 0.0), cp(0.58, 1.0), cp(1.0, 1.0));
        let curve = BezierCurve::new(vec![seg]).unwrap();
        let mut prev_err = f64::INFINITY;
        for samples in [2u32, 8, 32] {
            let cfg = Config {
                linearization_samples_per_segment: samples,
                ..Config::default()
            };
            let lin = curve.linearize(&cfg).unwrap();
            let x = Ordinate(0.3);
            let lin_y = lin.output_at_input(x).unwrap().value();
            let bez_y = curve.output_at_input(x, &cfg).unwrap().value();
            let err = (lin_y - bez_y).abs();
            assert!(err <= prev_err + 1e-9);
            prev_err = err;
        }
    }
}
