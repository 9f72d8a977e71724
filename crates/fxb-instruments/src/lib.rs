//! # fxb-instruments
//!
//! FX barrier option definitions: option and barrier kinds, the validated
//! [`BarrierContract`] with its raw [`BarrierContractSpec`] input form, and
//! the [`PricingEngine`] / [`VanillaPricer`] seams engines implement.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod instrument;
pub mod payoff;

pub use barrier::{
    BarrierContract, BarrierContractBuilder, BarrierContractSpec, BarrierType, DEFAULT_STEPS,
};
pub use instrument::{PricingEngine, PricingResults, VanillaPricer};
pub use payoff::{OptionType, PlainVanillaPayoff};
