//! `VolatilityGrid`: implied volatilities interpolated from an
//! (expiry × strike) grid.
//!
//! Interpolation is bilinear on **total variance** (`σ²·t`) so that the
//! surface stays calendar-consistent between expiry pillars. Queries inside
//! the grid are answered by [`try_implied_vol`]; queries outside it return
//! `None`, and [`implied_vol`] falls back to constant extrapolation from the
//! nearest edge of the grid.
//!
//! [`try_implied_vol`]: VolatilityProvider::try_implied_vol
//! [`implied_vol`]: VolatilityProvider::implied_vol

use crate::volatility_provider::VolatilityProvider;
use fxb_core::{ensure, errors::Result, Real, Time, Volatility};

/// An implied-volatility grid over expiry times and strikes.
#[derive(Debug, Clone)]
pub struct VolatilityGrid {
    /// Expiry times in years (strictly ascending, positive).
    times: Vec<Time>,
    /// Strikes (strictly ascending, positive).
    strikes: Vec<Real>,
    /// `variances[i][j] = σ²(t_i, K_j) · t_i`.
    variances: Vec<Vec<Real>>,
}

impl VolatilityGrid {
    /// Build a grid from expiry times, strikes and `vols[i][j]` = implied
    /// vol for `times[i]`, `strikes[j]`.
    ///
    /// At least two pillars are required in each dimension.
    pub fn new(times: &[Time], strikes: &[Real], vols: &[Vec<Volatility>]) -> Result<Self> {
        ensure!(times.len() >= 2, "need at least 2 expiry times, got {}", times.len());
        ensure!(strikes.len() >= 2, "need at least 2 strikes, got {}", strikes.len());
        ensure!(
            times[0] > 0.0 && times.windows(2).all(|w| w[1] > w[0]),
            "expiry times must be positive and strictly ascending"
        );
        ensure!(
            strikes[0] > 0.0 && strikes.windows(2).all(|w| w[1] > w[0]),
            "strikes must be positive and strictly ascending"
        );
        ensure!(
            vols.len() == times.len(),
            "vols rows ({}) must match expiry count ({})",
            vols.len(),
            times.len()
        );
        for (i, row) in vols.iter().enumerate() {
            ensure!(
                row.len() == strikes.len(),
                "vols row {i} length ({}) must match strikes length ({})",
                row.len(),
                strikes.len()
            );
            ensure!(
                row.iter().all(|v| v.is_finite() && *v > 0.0),
                "vols row {i} contains a non-positive or non-finite volatility"
            );
        }

        let variances = vols
            .iter()
            .zip(times)
            .map(|(row, &t)| row.iter().map(|&v| v * v * t).collect())
            .collect();

        Ok(Self {
            times: times.to_vec(),
            strikes: strikes.to_vec(),
            variances,
        })
    }

    /// `true` if `(strike, maturity)` lies within the grid bounds.
    pub fn contains(&self, strike: Real, maturity: Time) -> bool {
        let (t_lo, t_hi) = (self.times[0], self.times[self.times.len() - 1]);
        let (k_lo, k_hi) = (self.strikes[0], self.strikes[self.strikes.len() - 1]);
        (t_lo..=t_hi).contains(&maturity) && (k_lo..=k_hi).contains(&strike)
    }

    /// Bilinear interpolation of total variance at an in-grid point.
    fn interpolate_variance(&self, t: Time, strike: Real) -> Real {
        let ti = find_interval(&self.times, t);
        let ki = find_interval(&self.strikes, strike);

        let t_frac = (t - self.times[ti]) / (self.times[ti + 1] - self.times[ti]);
        let k_frac = (strike - self.strikes[ki]) / (self.strikes[ki + 1] - self.strikes[ki]);

        let v00 = self.variances[ti][ki];
        let v01 = self.variances[ti][ki + 1];
        let v10 = self.variances[ti + 1][ki];
        let v11 = self.variances[ti + 1][ki + 1];

        let v0 = v00 + k_frac * (v01 - v00);
        let v1 = v10 + k_frac * (v11 - v10);

        v0 + t_frac * (v1 - v0)
    }
}

/// Find the index `i` such that `xs[i] <= x < xs[i+1]`, clamped to
/// `[0, n-2]`. Requires `xs.len() >= 2`.
fn find_interval(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    // First index with xs[i] > x, minus one.
    xs.partition_point(|&p| p <= x) - 1
}

impl VolatilityProvider for VolatilityGrid {
    fn try_implied_vol(&self, strike: Real, maturity: Time) -> Option<Volatility> {
        if !self.contains(strike, maturity) {
            return None;
        }
        Some((self.interpolate_variance(maturity, strike) / maturity).sqrt())
    }

    /// Flat extrapolation outside the grid. A NaN coordinate pins to the
    /// first pillar on its axis.
    fn implied_vol(&self, strike: Real, maturity: Time) -> Volatility {
        let t = pin(&self.times, maturity);
        let k = pin(&self.strikes, strike);
        (self.interpolate_variance(t, k) / t).sqrt()
    }
}

fn pin(pillars: &[Real], x: Real) -> Real {
    if x.is_nan() {
        return pillars[0];
    }
    x.clamp(pillars[0], pillars[pillars.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_grid() -> VolatilityGrid {
        let times = [0.25, 0.5, 1.0];
        let strikes = [80.0, 100.0, 120.0];
        // Simple smile: higher vol at wings
        let vols = vec![
            vec![0.25, 0.20, 0.22], // 3M
            vec![0.24, 0.19, 0.21], // 6M
            vec![0.23, 0.18, 0.20], // 1Y
        ];
        VolatilityGrid::new(&times, &strikes, &vols).unwrap()
    }

    #[test]
    fn grid_at_pillar_points() {
        let grid = sample_grid();
        assert_abs_diff_eq!(grid.implied_vol(100.0, 0.25), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(120.0, 1.0), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(80.0, 0.5), 0.24, epsilon = 1e-12);
    }

    #[test]
    fn grid_interpolation_strike() {
        let grid = sample_grid();
        let vol = grid.try_implied_vol(90.0, 0.25).unwrap();
        assert!(vol > 0.20 && vol < 0.25, "vol = {vol}");
    }

    #[test]
    fn grid_interpolation_time() {
        let grid = sample_grid();
        let vol = grid.try_implied_vol(100.0, 0.75).unwrap();
        assert!(vol > 0.18 && vol < 0.19, "vol = {vol}");
    }

    #[test]
    fn grid_out_of_domain_is_none() {
        let grid = sample_grid();
        assert_eq!(grid.try_implied_vol(50.0, 0.5), None);
        assert_eq!(grid.try_implied_vol(100.0, 3.0), None);
        assert_eq!(grid.try_implied_vol(100.0, 0.1), None);
    }

    #[test]
    fn grid_implied_vol_extrapolates_flat() {
        let grid = sample_grid();
        assert_abs_diff_eq!(grid.implied_vol(50.0, 0.25), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(200.0, 0.25), 0.22, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(100.0, 5.0), 0.18, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(100.0, 0.01), 0.20, epsilon = 1e-12);
    }

    #[test]
    fn grid_implied_vol_is_finite_for_nan_queries() {
        let grid = sample_grid();
        assert_abs_diff_eq!(grid.implied_vol(Real::NAN, 0.25), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(100.0, Real::NAN), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(Real::NAN, Real::NAN), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.implied_vol(Real::INFINITY, 1.0), 0.20, epsilon = 1e-12);
        assert_eq!(grid.try_implied_vol(Real::NAN, 0.5), None);
    }

    #[test]
    fn grid_rejects_malformed_input() {
        let vols = vec![vec![0.2, 0.2], vec![0.2, 0.2]];
        assert!(VolatilityGrid::new(&[0.5], &[90.0, 110.0], &vols[..1]).is_err());
        assert!(VolatilityGrid::new(&[1.0, 0.5], &[90.0, 110.0], &vols).is_err());
        assert!(VolatilityGrid::new(&[0.5, 1.0], &[110.0, 90.0], &vols).is_err());
        assert!(VolatilityGrid::new(&[0.5, 1.0], &[90.0, 110.0], &vols[..1]).is_err());
        let bad = vec![vec![0.2, Real::NAN], vec![0.2, 0.2]];
        assert!(VolatilityGrid::new(&[0.5, 1.0], &[90.0, 110.0], &bad).is_err());
    }
}
