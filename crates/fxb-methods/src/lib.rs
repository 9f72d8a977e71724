//! # fxb-methods
//!
//! Numerical methods for barrier pricing: the CRR binomial lattice, the
//! barrier-survival field and the knock-out value field.
//!
//! # Modules
//!
//! * [`lattice`]: binomial tree, survival tracking and backward induction

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: binomial tree, survival and value fields.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    price_european, BarrierValueField, BinomialTree, CrrParameters, KnockOutWeighting,
    SurvivalField, TriangularField,
};
