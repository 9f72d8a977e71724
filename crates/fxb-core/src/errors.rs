//! Error types for fxbarrier.
//!
//! Every failure in the pricing stack is local and non-retryable: it comes
//! from caller-supplied parameters, never from I/O or transient state. The
//! `ensure!`, `ensure_post!` and `fail!` macros defined here are the only
//! way library code raises them.

use thiserror::Error;

use crate::{Probability, Size};

/// The top-level error type used throughout fxbarrier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid contract or engine configuration. Raised before any lattice
    /// node is computed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The risk-neutral up-probability fell outside `(0, 1)`.
    ///
    /// The rates, volatility and step size are not arbitrage-consistent for
    /// the requested lattice. The probability is reported as computed; it is
    /// never clamped.
    #[error(
        "degenerate lattice: risk-neutral up-probability {up_probability} \
         outside (0, 1) with {steps} steps"
    )]
    DegenerateLattice {
        /// The offending up-probability `q`.
        up_probability: Probability,
        /// Step count the lattice was built with.
        steps: Size,
    },

    /// A computed result violated an invariant it must satisfy.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),
}

impl Error {
    /// `true` for errors raised by input validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Shorthand `Result` type used throughout fxbarrier.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use fxb_core::{ensure, errors::Error};
/// fn positive(x: f64) -> fxb_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use fxb_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> fxb_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` immediately.
///
/// # Example
/// ```
/// use fxb_core::{fail, errors::Error};
/// fn always_err() -> fxb_core::errors::Result<()> {
///     fail!("unsupported kind '{}'", "sideways");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Configuration(format!($($msg)*)))
    };
}
