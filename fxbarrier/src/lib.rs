//! # fxbarrier
//!
//! FX barrier option pricing on a recombining binomial lattice with
//! per-node barrier-survival tracking.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `fxb-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use fxbarrier::{price_spec, BarrierContractSpec};
//!
//! let spec = BarrierContractSpec {
//!     spot: 100.0,
//!     strike: 100.0,
//!     maturity: 1.0,
//!     volatility: 0.2,
//!     domestic_rate: 0.05,
//!     foreign_rate: 0.02,
//!     barrier_level: 90.0,
//!     barrier_kind: "down-out".into(),
//!     option_kind: "call".into(),
//!     steps: 200,
//! };
//! let npv = price_spec(spec).unwrap();
//! assert!(npv >= 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use fxb_core as core;

/// Normal distribution and floating-point comparisons.
pub use fxb_math as math;

/// Barrier contracts, payoffs and engine seams.
pub use fxb_instruments as instruments;

/// Volatility providers.
pub use fxb_termstructures as termstructures;

/// Binomial lattice, survival and value fields.
pub use fxb_methods as methods;

/// Lattice, analytic and Vanna-Volga pricing engines.
pub use fxb_pricingengines as pricingengines;

pub use fxb_core::{Error, Result};
pub use fxb_instruments::{
    BarrierContract, BarrierContractBuilder, BarrierContractSpec, BarrierType, OptionType,
    PricingEngine, PricingResults, VanillaPricer,
};
pub use fxb_methods::KnockOutWeighting;
pub use fxb_pricingengines::{
    price, AnalyticBarrierEngine, BinomialBarrierEngine, BlackScholesPricer,
    VannaVolgaBarrierEngine, VannaVolgaPricer, VannaVolgaQuote,
};
pub use fxb_termstructures::{FallbackVolatility, FlatVolatility, VolatilityGrid, VolatilityProvider};

/// Validate a raw contract and price it on the lattice with default engine
/// settings.
///
/// Kind strings are checked before any numeric field, and nothing is
/// computed unless the whole contract validates.
pub fn price_spec(spec: BarrierContractSpec) -> Result<fxb_core::Price> {
    let contract = BarrierContract::try_from(spec)?;
    price(&contract)
}
