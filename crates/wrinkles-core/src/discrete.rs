#![allow(dead_code)]
//! Discrete sampling grid bridge: continuous ordinates <-> integer sample
//! indices.
//!
//! A `DiscreteInfo` defines a sampling grid rooted at ordinate 0. Sample index
//! `i` covers the half-open interval `[(i - start_index)/rate, (i - start_index
//! + 1)/rate)`. Intervals are half-open throughout: the upper boundary of a
//! sample belongs to the *next* sample.

use crate::error::{Error, Result};
use crate::ordinate::{Interval, Ordinate};
use crate::rational::Rational;
use serde::{Deserialize, Serialize};

/// Per-space sample rate metadata.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiscreteInfo {
    pub sample_rate_hz: Rational,
    pub start_index: i64,
}

impl DiscreteInfo {
    pub fn new(sample_rate_hz: Rational, start_index: i64) -> Self {
        DiscreteInfo {
            sample_rate_hz,
            start_index,
        }
    }

    fn rate_f64(&self) -> f64 {
        self.sample_rate_hz.to_f64()
    }

    /// The ordinate at the start of sample `i`.
    pub fn ord_for_index(&self, i: i64) -> Result<Ordinate> {
        if self.sample_rate_hz.is_infinite() || self.sample_rate_hz.is_invalid() {
            return Err(Error::incompatible_rates(
                "ord_for_index requires a finite, valid sample rate",
            ));
        }
        let n = i - self.start_index;
        Ok(Ordinate(n as f64 / self.rate_f64()))
    }

    /// The half-open interval spanning sample `i`.
    pub fn ord_interval_for_index(&self, i: i64) -> Result<Interval> {
        let start = self.ord_for_index(i)?;
        let end = self.ord_for_index(i + 1)?;
        Ok(Interval::new(start, end))
    }

    /// The index whose half-open interval contains ordinate `t`.
    pub fn index_for_ord(&self, t: Ordinate) -> Result<i64> {
        if self.sample_rate_hz.is_infinite() || self.sample_rate_hz.is_invalid() {
            return Err(Error::incompatible_rates(
                "index_for_ord requires a finite, valid sample rate",
            ));
        }
        if t.is_nan() || t.is_infinite() {
            return Err(Error::out_of_bounds(
                "index_for_ord requires a finite ordinate",
            ));
        }
        let scaled = (t.value() * self.rate_f64()).floor();
        Ok(scaled as i64 + self.start_index)
    }

    /// Number of samples covering `[0, duration)`, computed as
    /// `ceil(duration * rate)`. `duration` is first decomposed into its own
    /// exact dyadic rational -- every finite `f64` is exactly `mantissa *
    /// 2^exponent` -- then multiplied against `sample_rate_hz`'s exact
    /// `num/den` and ceil'd with integer arithmetic, so an exact multiple of
    /// the sample period lands on that multiple rather than one sample high.
    pub fn buffer_size_for_length(&self, duration: Ordinate) -> Result<i64> {
        if self.sample_rate_hz.is_infinite() || self.sample_rate_hz.is_invalid() {
            return Err(Error::incompatible_rates(
                "buffer_size_for_length requires a finite, valid sample rate",
            ));
        }
        if duration.value() < 0.0 {
            return Err(Error::out_of_bounds(
                "buffer_size_for_length requires a non-negative duration",
            ));
        }
        let rate = self.sample_rate_hz;
        let (dur_num, dur_den) = exact_fraction(duration.value());
        let num = dur_num * rate.num as i128;
        let den = dur_den * rate.den as i128;
        Ok(ceil_div(num, den) as i64)
    }

    /// The continuous interval covered by a buffer of `count` samples
    /// starting at `start_index`.
    pub fn extent(&self, count: i64) -> Result<Interval> {
        let start = self.ord_for_index(self.start_index)?;
        let end = self.ord_for_index(self.start_index + count)?;
        Ok(Interval::new(start, end))
    }
}

/// Decompose a finite, non-negative `f64` into an exact `(numerator,
/// denominator)` rational. Every finite `f64` is exactly representable as
/// `mantissa * 2^exponent`, so this is lossless, unlike round-tripping
/// through the float's decimal rendering.
fn exact_fraction(x: f64) -> (i128, i128) {
    if x == 0.0 {
        return (0, 1);
    }
    let bits = x.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i64;
    let mantissa_bits = bits & 0xf_ffff_ffff_ffff;
    let (mantissa, exponent) = if exponent_bits == 0 {
        // subnormal: value = mantissa_bits * 2^-1074
        (mantissa_bits as i128, -1074i64)
    } else {
        // normalized: value = (implicit 1 | mantissa_bits) * 2^(exponent_bits - 1075)
        (((mantissa_bits | (1u64 << 52)) as i128), exponent_bits - 1075)
    };
    if exponent >= 0 {
        (mantissa << exponent, 1)
    } else {
        (mantissa, 1i128 << (-exponent))
    }
}

/// `ceil(n / d)` for a signed numerator and strictly positive denominator.
fn ceil_div(n: i128, d: i128) -> i128 {
    let q = n.div_euclid(d);
    let r = n.rem_euclid(d);
    if r == 0 {
        q
    } else {
        q + 1
    }
}
