//! Floating-point comparison utilities.

use fxb_core::Real;

/// Default epsilon for close comparisons.
pub const EPSILON: Real = 1e-10;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `|a - b| <= n * epsilon` where `epsilon` is the
/// machine-epsilon relative to `max(|a|, |b|)`.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs().max(b.abs())) * f64::EPSILON * n as f64;
    (a - b).abs() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_basic() {
        assert!(close(1.0, 1.0 + 1e-11, EPSILON));
        assert!(!close(1.0, 1.0 + 1e-9, EPSILON));
    }

    #[test]
    fn close_enough_reciprocal_product() {
        // u * (1/u) is within a few ulps of one for any lattice step
        for &u in &[1.000_1, 1.014_2, 1.22, 3.5] {
            assert!(close_enough(u * (1.0 / u), 1.0, 4), "u = {u}");
        }
        assert!(!close_enough(1.0, 1.0 + 1e-12, 4));
    }
}
