//! # fxb-math
//!
//! Mathematical utilities: the standard normal distribution (via `statrs`)
//! and floating-point comparisons used to check lattice invariants.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, close_enough, EPSILON};
pub use distributions::{inverse_normal_cdf, normal_cdf, normal_pdf};
