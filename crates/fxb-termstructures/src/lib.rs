//! # fxb-termstructures
//!
//! Volatility providers consumed by the pricing layer.
//!
//! The lattice engine treats volatility as one constant per pricing run. A
//! [`VolatilityProvider`] is how callers resolve that constant from a
//! (strike, maturity) pair; calibration strategies plug in behind the trait.
//!
//! ## Providers
//!
//! - [`FlatVolatility`]: one volatility everywhere
//! - [`VolatilityGrid`]: bilinear interpolation on total variance over an
//!   expiry × strike grid
//! - [`FallbackVolatility`]: wraps any provider and substitutes a fixed
//!   scalar for out-of-domain or non-finite answers

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod volatility_grid;
pub mod volatility_provider;

pub use volatility_grid::VolatilityGrid;
pub use volatility_provider::{FallbackVolatility, FlatVolatility, VolatilityProvider};
