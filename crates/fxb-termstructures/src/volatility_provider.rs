//! The `VolatilityProvider` trait and its scalar implementations.

use fxb_core::{ensure, errors::Result, Real, Time, Volatility};
use tracing::warn;

/// Source of an annualised implied volatility for a (strike, maturity) pair.
///
/// Implementors must never hand a non-finite value to callers of
/// [`implied_vol`](VolatilityProvider::implied_vol): out-of-domain queries
/// resolve to a documented fallback instead.
pub trait VolatilityProvider: std::fmt::Debug + Send + Sync {
    /// Volatility at `(strike, maturity)`, or `None` when the query lies
    /// outside the provider's calibrated domain.
    fn try_implied_vol(&self, strike: Real, maturity: Time) -> Option<Volatility>;

    /// Volatility at `(strike, maturity)`, always finite and positive.
    fn implied_vol(&self, strike: Real, maturity: Time) -> Volatility;
}

/// A flat volatility: the same value for every strike and maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatVolatility {
    volatility: Volatility,
}

impl FlatVolatility {
    /// Create a flat provider. `volatility` must be finite and positive.
    pub fn new(volatility: Volatility) -> Result<Self> {
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "flat volatility must be finite and positive, got {volatility}"
        );
        Ok(Self { volatility })
    }

    /// The constant volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }
}

impl VolatilityProvider for FlatVolatility {
    fn try_implied_vol(&self, _strike: Real, _maturity: Time) -> Option<Volatility> {
        Some(self.volatility)
    }

    fn implied_vol(&self, _strike: Real, _maturity: Time) -> Volatility {
        self.volatility
    }
}

/// Wraps a provider and substitutes a fixed fallback whenever the inner
/// provider has no answer, or answers with NaN, infinity or a non-positive
/// number.
#[derive(Debug, Clone)]
pub struct FallbackVolatility<P> {
    inner: P,
    fallback: Volatility,
}

impl<P: VolatilityProvider> FallbackVolatility<P> {
    /// Wrap `inner` with `fallback`, which must be finite and positive.
    pub fn new(inner: P, fallback: Volatility) -> Result<Self> {
        ensure!(
            fallback.is_finite() && fallback > 0.0,
            "fallback volatility must be finite and positive, got {fallback}"
        );
        Ok(Self { inner, fallback })
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The substituted scalar.
    pub fn fallback(&self) -> Volatility {
        self.fallback
    }
}

impl<P: VolatilityProvider> VolatilityProvider for FallbackVolatility<P> {
    fn try_implied_vol(&self, strike: Real, maturity: Time) -> Option<Volatility> {
        Some(self.implied_vol(strike, maturity))
    }

    fn implied_vol(&self, strike: Real, maturity: Time) -> Volatility {
        match self.inner.try_implied_vol(strike, maturity) {
            Some(vol) if vol.is_finite() && vol > 0.0 => vol,
            other => {
                warn!(
                    strike,
                    maturity,
                    answer = ?other,
                    fallback = self.fallback,
                    "volatility query out of domain, using fallback"
                );
                self.fallback
            }
        }
    }
}
