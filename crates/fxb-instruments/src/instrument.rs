//! Pricing-engine seams.
//!
//! Engines implement [`PricingEngine`] for the argument type they price and
//! return a [`PricingResults`]: the NPV plus any named by-products. Vanilla
//! reference prices come from a [`VanillaPricer`], so closed-form and
//! calibrated strategies can be swapped without touching their callers.

use crate::payoff::OptionType;
use fxb_core::{errors::Result, Price, Rate, Real, Time, Volatility};
use std::collections::HashMap;

/// Results of pricing an instrument.
///
/// Contains the NPV and optionally additional named results
/// (e.g. "delta", "survival_probability").
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// Base trait for all pricing engines.
///
/// A pricing engine computes `PricingResults` for a specific argument type.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<PricingResults>;
}

/// Canonical interface for European vanilla FX option prices.
pub trait VanillaPricer: std::fmt::Debug + Send + Sync {
    /// Present value of a European vanilla option.
    #[allow(clippy::too_many_arguments)]
    fn vanilla_price(
        &self,
        spot: Price,
        strike: Price,
        maturity: Time,
        volatility: Volatility,
        domestic_rate: Rate,
        foreign_rate: Rate,
        option_type: OptionType,
    ) -> Price;
}
