//! Single-barrier European FX options.
//!
//! A [`BarrierContract`] carries every parameter a pricing run needs. It can
//! only be obtained through [`BarrierContractBuilder::build`] or
//! `TryFrom<BarrierContractSpec>`, both of which validate the full parameter
//! set, so engines never see a malformed contract.

use crate::payoff::{OptionType, PlainVanillaPayoff};
use fxb_core::{ensure, fail, errors::Result, Error, Price, Rate, Real, Size, Time, Volatility};
use fxb_termstructures::VolatilityProvider;
use std::fmt;
use std::str::FromStr;

/// Default lattice step count when none is given.
pub const DEFAULT_STEPS: Size = 100;

// ────────────────────────────────────────────────────────────────────────────
// BarrierType
// ────────────────────────────────────────────────────────────────────────────

/// Barrier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierType {
    /// Up-and-in: becomes active when the spot rises to the barrier.
    UpIn,
    /// Up-and-out: expires when the spot rises to the barrier.
    UpOut,
    /// Down-and-in: becomes active when the spot falls to the barrier.
    DownIn,
    /// Down-and-out: expires when the spot falls to the barrier.
    DownOut,
}

impl BarrierType {
    /// All four barrier types.
    pub const ALL: [BarrierType; 4] = [
        BarrierType::UpIn,
        BarrierType::UpOut,
        BarrierType::DownIn,
        BarrierType::DownOut,
    ];

    /// `true` for the up-and-* types.
    pub fn is_up(self) -> bool {
        matches!(self, BarrierType::UpIn | BarrierType::UpOut)
    }

    /// `true` for the *-and-in types.
    pub fn is_knock_in(self) -> bool {
        matches!(self, BarrierType::UpIn | BarrierType::DownIn)
    }

    /// `true` for the *-and-out types.
    pub fn is_knock_out(self) -> bool {
        !self.is_knock_in()
    }

    /// The knock-out type monitoring the same barrier direction.
    ///
    /// Knock-in values are obtained as `vanilla − knock_out` on this type.
    pub fn knock_out_counterpart(self) -> BarrierType {
        match self {
            BarrierType::UpIn | BarrierType::UpOut => BarrierType::UpOut,
            BarrierType::DownIn | BarrierType::DownOut => BarrierType::DownOut,
        }
    }

    /// Whether `price` has crossed `barrier` in this type's triggering
    /// direction. Touching the barrier counts as a crossing.
    #[inline]
    pub fn is_breached(self, price: Real, barrier: Real) -> bool {
        if self.is_up() {
            price >= barrier
        } else {
            price <= barrier
        }
    }

    /// Hyphenated identifier used in contract specs (`"up-in"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            BarrierType::UpIn => "up-in",
            BarrierType::UpOut => "up-out",
            BarrierType::DownIn => "down-in",
            BarrierType::DownOut => "down-out",
        }
    }
}

impl fmt::Display for BarrierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarrierType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up-in" => Ok(BarrierType::UpIn),
            "up-out" => Ok(BarrierType::UpOut),
            "down-in" => Ok(BarrierType::DownIn),
            "down-out" => Ok(BarrierType::DownOut),
            _ => fail!(
                "invalid barrier kind '{s}': expected one of 'up-in', 'up-out', \
                 'down-in', 'down-out'"
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// BarrierContract
// ────────────────────────────────────────────────────────────────────────────

/// A validated single-barrier European FX option plus the lattice step
/// count to price it with.
///
/// Immutable once built. Invariants: spot, strike, barrier, maturity and
/// volatility are finite and positive; rates are finite; `steps >= 1`.
/// The barrier is *not* required to sit on a particular side of the spot.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierContract {
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Price,
    strike: Price,
    barrier: Price,
    maturity: Time,
    volatility: Volatility,
    domestic_rate: Rate,
    foreign_rate: Rate,
    steps: Size,
}

impl BarrierContract {
    /// Start building a contract.
    pub fn builder(
        option_type: OptionType,
        barrier_type: BarrierType,
        spot: Price,
        strike: Price,
        barrier: Price,
        maturity: Time,
    ) -> BarrierContractBuilder {
        BarrierContractBuilder::new(option_type, barrier_type, spot, strike, barrier, maturity)
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Barrier direction and knock style.
    pub fn barrier_type(&self) -> BarrierType {
        self.barrier_type
    }

    /// Spot FX rate `S` (domestic per unit of foreign).
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// Strike `K`.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Barrier level `B`.
    pub fn barrier(&self) -> Price {
        self.barrier
    }

    /// Time to maturity `T` in years.
    pub fn maturity(&self) -> Time {
        self.maturity
    }

    /// Annualised volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Domestic continuously compounded rate `r_d`.
    pub fn domestic_rate(&self) -> Rate {
        self.domestic_rate
    }

    /// Foreign continuously compounded rate `r_f`.
    pub fn foreign_rate(&self) -> Rate {
        self.foreign_rate
    }

    /// Lattice step count `N`.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// The terminal payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// `true` if the spot already sits on or beyond the barrier.
    pub fn is_breached_at_inception(&self) -> bool {
        self.barrier_type.is_breached(self.spot, self.barrier)
    }

    /// Same contract with a different lattice step count.
    pub fn with_steps(&self, steps: Size) -> Result<Self> {
        ensure!(steps >= 1, "steps must be >= 1, got {steps}");
        Ok(Self {
            steps,
            ..self.clone()
        })
    }

    /// Same contract with a different barrier type.
    pub fn with_barrier_type(&self, barrier_type: BarrierType) -> Self {
        Self {
            barrier_type,
            ..self.clone()
        }
    }
}

impl fmt::Display for BarrierContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} K={} B={} S={} T={} σ={} rd={} rf={} N={}",
            self.barrier_type,
            self.option_type,
            self.strike,
            self.barrier,
            self.spot,
            self.maturity,
            self.volatility,
            self.domestic_rate,
            self.foreign_rate,
            self.steps
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for [`BarrierContract`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct BarrierContractBuilder {
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Price,
    strike: Price,
    barrier: Price,
    maturity: Time,
    volatility: Option<Volatility>,
    domestic_rate: Rate,
    foreign_rate: Rate,
    steps: Size,
}

impl BarrierContractBuilder {
    /// Begin building a contract. Rates default to zero and the step count
    /// to [`DEFAULT_STEPS`]; a volatility must be supplied.
    pub fn new(
        option_type: OptionType,
        barrier_type: BarrierType,
        spot: Price,
        strike: Price,
        barrier: Price,
        maturity: Time,
    ) -> Self {
        Self {
            option_type,
            barrier_type,
            spot,
            strike,
            barrier,
            maturity,
            volatility: None,
            domestic_rate: 0.0,
            foreign_rate: 0.0,
            steps: DEFAULT_STEPS,
        }
    }

    /// Set a constant volatility.
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Resolve the volatility from `provider` at this contract's strike and
    /// maturity.
    pub fn with_volatility_from(mut self, provider: &dyn VolatilityProvider) -> Self {
        self.volatility = Some(provider.implied_vol(self.strike, self.maturity));
        self
    }

    /// Set the domestic and foreign continuously compounded rates.
    pub fn with_rates(mut self, domestic: Rate, foreign: Rate) -> Self {
        self.domestic_rate = domestic;
        self.foreign_rate = foreign;
        self
    }

    /// Set the lattice step count.
    pub fn with_steps(mut self, steps: Size) -> Self {
        self.steps = steps;
        self
    }

    /// Validate and build the contract.
    pub fn build(self) -> Result<BarrierContract> {
        let Some(volatility) = self.volatility else {
            fail!("volatility must be set");
        };
        for (name, value) in [
            ("spot", self.spot),
            ("strike", self.strike),
            ("barrier", self.barrier),
            ("maturity", self.maturity),
            ("volatility", volatility),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "{name} must be finite and positive, got {value}"
            );
        }
        ensure!(
            self.domestic_rate.is_finite() && self.foreign_rate.is_finite(),
            "rates must be finite, got rd={} rf={}",
            self.domestic_rate,
            self.foreign_rate
        );
        ensure!(self.steps >= 1, "steps must be >= 1, got {}", self.steps);

        Ok(BarrierContract {
            option_type: self.option_type,
            barrier_type: self.barrier_type,
            spot: self.spot,
            strike: self.strike,
            barrier: self.barrier,
            maturity: self.maturity,
            volatility,
            domestic_rate: self.domestic_rate,
            foreign_rate: self.foreign_rate,
            steps: self.steps,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw input contract
// ────────────────────────────────────────────────────────────────────────────

/// The untyped input form of a contract: string kinds and a signed step
/// count, exactly as received from a configuration file or caller.
///
/// Convert with `BarrierContract::try_from(spec)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierContractSpec {
    /// Spot FX rate.
    pub spot: Real,
    /// Strike.
    pub strike: Real,
    /// Time to maturity in years.
    pub maturity: Real,
    /// Annualised volatility.
    pub volatility: Real,
    /// Domestic rate.
    pub domestic_rate: Real,
    /// Foreign rate.
    pub foreign_rate: Real,
    /// Barrier level.
    pub barrier_level: Real,
    /// One of `up-in`, `up-out`, `down-in`, `down-out`.
    pub barrier_kind: String,
    /// `call` or `put`.
    pub option_kind: String,
    /// Lattice step count.
    #[cfg_attr(feature = "serde", serde(default = "default_steps"))]
    pub steps: i64,
}

#[cfg(feature = "serde")]
fn default_steps() -> i64 {
    DEFAULT_STEPS as i64
}

impl TryFrom<BarrierContractSpec> for BarrierContract {
    type Error = Error;

    fn try_from(spec: BarrierContractSpec) -> Result<Self> {
        // Kinds are checked first so a bad kind is reported before any
        // numeric problem.
        let barrier_type: BarrierType = spec.barrier_kind.parse()?;
        let option_type: OptionType = spec.option_kind.parse()?;
        ensure!(spec.steps >= 1, "steps must be >= 1, got {}", spec.steps);
        let steps = Size::try_from(spec.steps)
            .map_err(|_| Error::Configuration(format!("steps {} out of range", spec.steps)))?;

        BarrierContract::builder(
            option_type,
            barrier_type,
            spec.spot,
            spec.strike,
            spec.barrier_level,
            spec.maturity,
        )
        .with_volatility(spec.volatility)
        .with_rates(spec.domestic_rate, spec.foreign_rate)
        .with_steps(steps)
        .build()
    }
}

impl From<&BarrierContract> for BarrierContractSpec {
    fn from(c: &BarrierContract) -> Self {
        Self {
            spot: c.spot,
            strike: c.strike,
            maturity: c.maturity,
            volatility: c.volatility,
            domestic_rate: c.domestic_rate,
            foreign_rate: c.foreign_rate,
            barrier_level: c.barrier,
            barrier_kind: c.barrier_type.to_string(),
            option_kind: c.option_type.to_string(),
            steps: c.steps as i64,
        }
    }
}
