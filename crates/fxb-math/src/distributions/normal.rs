//! Standard normal distribution.
//!
//! The cumulative function delegates to `statrs`'s complementary error
//! function, which keeps full double precision deep in both tails. The
//! closed-form barrier formulas evaluate `Φ` at arguments of ±6 and beyond
//! for far barriers, where a polynomial approximation loses digits.
//! The quantile function uses the inverse complementary error function
//! from the same crate.

use fxb_core::Real;
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{FRAC_1_SQRT_2, PI, SQRT_2};

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
///
/// `Φ(x) = ½ erfc(−x / √2)`
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// The standard normal quantile function Φ⁻¹(p).
///
/// `Φ⁻¹(p) = −√2 erfc⁻¹(2p)`. Returns NaN outside `[0, 1]`.
#[inline]
pub fn inverse_normal_cdf(p: Real) -> Real {
    if !(0.0..=1.0).contains(&p) {
        return Real::NAN;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}
