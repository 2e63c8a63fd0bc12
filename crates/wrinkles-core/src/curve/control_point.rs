#![allow(dead_code)]
//! 2D control points used by curves, and a plain dual-number pair for
//! carrying derivatives through curve evaluation.

use crate::ordinate::Ordinate;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point `(in, out)` — `in` is the curve's input axis, `out` its output.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ControlPoint {
    pub r#in: Ordinate,
    pub out: Ordinate,
}

impl ControlPoint {
    pub fn new(input: f64, output: f64) -> Self {
        ControlPoint {
            r#in: Ordinate(input),
            out: Ordinate(output),
        }
    }

    pub fn from_ordinates(input: Ordinate, output: Ordinate) -> Self {
        ControlPoint {
            r#in: input,
            out: output,
        }
    }

    pub fn distance(&self, other: &ControlPoint) -> f64 {
        let di = self.r#in.value() - other.r#in.value();
        let doo = self.out.value() - other.out.value();
        (di * di + doo * doo).sqrt()
    }

    pub fn scale(&self, s: f64) -> ControlPoint {
        ControlPoint::new(self.r#in.value() * s, self.out.value() * s)
    }
}

impl Add for ControlPoint {
    type Output = ControlPoint;
    fn add(self, rhs: ControlPoint) -> ControlPoint {
        ControlPoint::from_ordinates(self.r#in + rhs.r#in, self.out + rhs.out)
    }
}

impl Sub for ControlPoint {
    type Output = ControlPoint;
    fn sub(self, rhs: ControlPoint) -> ControlPoint {
        ControlPoint::from_ordinates(self.r#in - rhs.r#in, self.out - rhs.out)
    }
}

impl Mul<f64> for ControlPoint {
    type Output = ControlPoint;
    fn mul(self, rhs: f64) -> ControlPoint {
        self.scale(rhs)
    }
}

/// A dual number `(real, infinitesimal)`. Evaluating a curve on a dual input
/// carries `dy/du` (or `dy/dx` when the real part is already reparameterized)
/// alongside the value, following the standard forward-mode-autodiff
/// arithmetic rules.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dual {
    pub real: f64,
    pub inf: f64,
}

impl Dual {
    pub fn new(real: f64, inf: f64) -> Self {
        Dual { real, inf }
    }

    /// A dual representing a constant (zero derivative).
    pub fn constant(real: f64) -> Self {
        Dual { real, inf: 0.0 }
    }

    /// A dual representing the evaluation variable itself (derivative 1).
    pub fn variable(real: f64) -> Self {
        Dual { real, inf: 1.0 }
    }
}

impl Add for Dual {
    type Output = Dual;
    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.real + rhs.real, self.inf + rhs.inf)
    }
}

impl Sub for Dual {
    type Output = Dual;
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.real - rhs.real, self.inf - rhs.inf)
    }
}

impl Mul for Dual {
    type Output = Dual;
    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(
            self.real * rhs.real,
            self.real * rhs.inf + self.inf * rhs.real,
        )
    }
}

impl Mul<f64> for Dual {
    type Output = Dual;
    fn mul(self, rhs: f64) -> Dual {
        Dual::new(self.real * rhs, self.inf * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_arithmetic() {
        let a = ControlPoint::new(1.0, 2.0);
        let b = ControlPoint::new(3.0, 4.0);
        let sum = a + b;
        assert_eq!(sum.r#in.value(), 4.0);
        assert_eq!(sum.out.value(), 6.0);
        assert_eq!((a - b).r#in.value(), -2.0);
    }

    #[test]
    fn distance_pythagoras() {
        let a = ControlPoint::new(0.0, 0.0);
        let b = ControlPoint::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn dual_product_rule() {
        // f(u) = u^2, at u=3: f=9, f'=2*3=6
        let u = Dual::variable(3.0);
        let f = u * u;
        assert_eq!(f.real, 9.0);
        assert_eq!(f.inf, 6.0);
    }
}
