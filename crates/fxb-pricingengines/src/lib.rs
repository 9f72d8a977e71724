//! # fxb-pricingengines
//!
//! Pricing engines for FX barrier options.
//!
//! ## Engines
//!
//! - [`BinomialBarrierEngine`]: CRR lattice with barrier-survival tracking
//! - [`AnalyticBarrierEngine`]: Reiner-Rubinstein closed form (continuous monitoring)
//! - [`BlackScholesPricer`]: Garman-Kohlhagen vanilla price and Greeks
//! - [`VannaVolgaPricer`] / [`VannaVolgaBarrierEngine`]: smile correction
//!   from ATM, risk-reversal and butterfly quotes

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_barrier_engine;
pub mod analytic_european_engine;
pub mod binomial_barrier_engine;
pub mod vanna_volga_engine;

pub use analytic_barrier_engine::{
    analytic_barrier_price, barrier_survival_probability, AnalyticBarrierEngine,
};
pub use analytic_european_engine::{garman_kohlhagen, BlackScholesPricer, VanillaGreeks};
pub use binomial_barrier_engine::{price, BinomialBarrierEngine};
pub use vanna_volga_engine::{
    vanna_volga_barrier_price, SmilePillar, VannaVolgaBarrierEngine, VannaVolgaBarrierPrice,
    VannaVolgaPricer, VannaVolgaQuote,
};
