//! Probability distributions.
//!
//! Only the standard normal is needed by the pricing stack; it delegates to
//! the `statrs` crate for the error function.

pub mod normal;

pub use normal::{inverse_normal_cdf, normal_cdf, normal_pdf};
