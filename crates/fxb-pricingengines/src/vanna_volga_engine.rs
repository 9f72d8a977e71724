//! Vanna-Volga smile adjustment for FX vanillas and barriers.
//!
//! The market smile is quoted by three numbers: the at-the-money volatility,
//! the 25-delta risk reversal and the 25-delta butterfly. They fix three
//! pillar options (25Δ put, delta-neutral straddle strike, 25Δ call). A
//! vanilla is hedged at the ATM volatility with the portfolio of pillars
//! that matches its vega, vanna and volga; the smile price is the flat
//! price plus that portfolio's market-minus-flat cost.
//!
//! Barriers reuse the vanilla correction, scaled by the continuous
//! no-touch probability for knock-outs and by its complement for
//! knock-ins, so in/out parity holds against the smile vanilla.

use fxb_core::{ensure, errors::Result, Price, Probability, Rate, Real, Time, Volatility};
use fxb_instruments::{
    BarrierContract, BarrierType, OptionType, PricingEngine, PricingResults, VanillaPricer,
};
use fxb_math::{close, distributions::inverse_normal_cdf, EPSILON};
use tracing::warn;

use crate::analytic_barrier_engine::{analytic_barrier_price, barrier_survival_probability};
use crate::analytic_european_engine::{garman_kohlhagen, VanillaGreeks};

/// Market smile quote: ATM volatility, 25Δ risk reversal and 25Δ butterfly.
///
/// Wing volatilities follow the broker convention
/// `σ_25C = σ_ATM + BF + RR/2`, `σ_25P = σ_ATM + BF − RR/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VannaVolgaQuote {
    atm_vol: Volatility,
    risk_reversal: Volatility,
    butterfly: Volatility,
}

impl VannaVolgaQuote {
    /// Create a quote. All three wing volatilities must be finite and
    /// positive.
    pub fn new(
        atm_vol: Volatility,
        risk_reversal: Volatility,
        butterfly: Volatility,
    ) -> Result<Self> {
        ensure!(
            atm_vol.is_finite() && atm_vol > 0.0,
            "ATM volatility must be finite and positive, got {atm_vol}"
        );
        ensure!(
            risk_reversal.is_finite() && butterfly.is_finite(),
            "risk reversal and butterfly must be finite, got {risk_reversal} and {butterfly}"
        );
        let quote = Self {
            atm_vol,
            risk_reversal,
            butterfly,
        };
        ensure!(
            quote.call_wing_vol() > 0.0 && quote.put_wing_vol() > 0.0,
            "quote implies non-positive wing volatility (25C {}, 25P {})",
            quote.call_wing_vol(),
            quote.put_wing_vol()
        );
        Ok(quote)
    }

    /// At-the-money volatility.
    pub fn atm_vol(&self) -> Volatility {
        self.atm_vol
    }

    /// 25-delta risk reversal `σ_25C − σ_25P`.
    pub fn risk_reversal(&self) -> Volatility {
        self.risk_reversal
    }

    /// 25-delta butterfly `(σ_25C + σ_25P)/2 − σ_ATM`.
    pub fn butterfly(&self) -> Volatility {
        self.butterfly
    }

    /// Volatility of the 25-delta call.
    pub fn call_wing_vol(&self) -> Volatility {
        self.atm_vol + self.butterfly + 0.5 * self.risk_reversal
    }

    /// Volatility of the 25-delta put.
    pub fn put_wing_vol(&self) -> Volatility {
        self.atm_vol + self.butterfly - 0.5 * self.risk_reversal
    }
}

/// One of the three market pillars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmilePillar {
    /// Pillar strike.
    pub strike: Price,
    /// Market volatility quoted at that strike.
    pub volatility: Volatility,
}

/// Vanilla pricer that adds the Vanna-Volga smile correction to the
/// Garman-Kohlhagen price at the quote's ATM volatility.
///
/// As a [`VanillaPricer`] it ignores the flat `volatility` argument: the
/// smile is defined entirely by the quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VannaVolgaPricer {
    quote: VannaVolgaQuote,
}

impl VannaVolgaPricer {
    /// Pricer for the given market quote.
    pub fn new(quote: VannaVolgaQuote) -> Self {
        Self { quote }
    }

    /// The market quote.
    pub fn quote(&self) -> VannaVolgaQuote {
        self.quote
    }

    /// Pillar strikes for the 25Δ put, ATM and 25Δ call, in that order.
    ///
    /// ATM is the delta-neutral straddle strike `S·e^{(r_d−r_f+σ²/2)T}`;
    /// the wings use premium-unadjusted spot deltas `±e^{−r_f T}N(±d₁)`.
    /// Strikes are non-finite when `e^{r_f T}/4 ≥ 1`, where no 25Δ call
    /// exists.
    pub fn pillars(
        &self,
        spot: Price,
        maturity: Time,
        domestic_rate: Rate,
        foreign_rate: Rate,
    ) -> [SmilePillar; 3] {
        let sqrt_t = maturity.sqrt();
        let alpha = inverse_normal_cdf(0.25 * (foreign_rate * maturity).exp());
        let strike = |vol: Volatility, shift: Real| {
            let drift = (domestic_rate - foreign_rate + 0.5 * vol * vol) * maturity;
            spot * (drift + shift * vol * sqrt_t).exp()
        };
        let put_vol = self.quote.put_wing_vol();
        let call_vol = self.quote.call_wing_vol();
        [
            SmilePillar {
                strike: strike(put_vol, alpha),
                volatility: put_vol,
            },
            SmilePillar {
                strike: strike(self.quote.atm_vol, 0.0),
                volatility: self.quote.atm_vol,
            },
            SmilePillar {
                strike: strike(call_vol, -alpha),
                volatility: call_vol,
            },
        ]
    }

    /// Weights of the pillar portfolio replicating the vega, vanna and
    /// volga of the option struck at `strike`, all at the ATM volatility.
    pub fn replication_weights(
        &self,
        spot: Price,
        strike: Price,
        maturity: Time,
        domestic_rate: Rate,
        foreign_rate: Rate,
    ) -> Option<[Real; 3]> {
        let atm = self.quote.atm_vol;
        let greeks = |k: Price| {
            let g = garman_kohlhagen(
                OptionType::Call,
                spot,
                k,
                domestic_rate,
                foreign_rate,
                atm,
                maturity,
            );
            second_order(&g)
        };
        let pillars = self.pillars(spot, maturity, domestic_rate, foreign_rate);
        let columns = pillars.map(|p| greeks(p.strike));
        let matrix = [
            [columns[0][0], columns[1][0], columns[2][0]],
            [columns[0][1], columns[1][1], columns[2][1]],
            [columns[0][2], columns[1][2], columns[2][2]],
        ];
        solve_3x3(matrix, greeks(strike))
    }

    /// Smile-consistent price of a European vanilla.
    pub fn smile_price(
        &self,
        option_type: OptionType,
        spot: Price,
        strike: Price,
        maturity: Time,
        domestic_rate: Rate,
        foreign_rate: Rate,
    ) -> Price {
        let atm = self.quote.atm_vol;
        let flat = garman_kohlhagen(
            option_type,
            spot,
            strike,
            domestic_rate,
            foreign_rate,
            atm,
            maturity,
        )
        .price;
        if maturity <= 0.0 {
            return flat;
        }

        let Some(weights) =
            self.replication_weights(spot, strike, maturity, domestic_rate, foreign_rate)
        else {
            warn!(
                spot,
                strike,
                maturity,
                "vanna-volga replication is singular; using the ATM price"
            );
            return flat;
        };

        // Call and put corrections coincide by parity.
        let correction: Real = self
            .pillars(spot, maturity, domestic_rate, foreign_rate)
            .iter()
            .zip(weights)
            .map(|(p, w)| {
                let call = |vol| {
                    garman_kohlhagen(
                        OptionType::Call,
                        spot,
                        p.strike,
                        domestic_rate,
                        foreign_rate,
                        vol,
                        maturity,
                    )
                    .price
                };
                w * (call(p.volatility) - call(atm))
            })
            .sum();
        flat + correction
    }
}

impl VanillaPricer for VannaVolgaPricer {
    fn vanilla_price(
        &self,
        spot: Price,
        strike: Price,
        maturity: Time,
        _volatility: Volatility,
        domestic_rate: Rate,
        foreign_rate: Rate,
        option_type: OptionType,
    ) -> Price {
        self.smile_price(option_type, spot, strike, maturity, domestic_rate, foreign_rate)
    }
}

fn second_order(g: &VanillaGreeks) -> [Real; 3] {
    [g.vega, g.vanna, g.volga]
}

// Cramer's rule; `None` for a singular or non-finite system. Singularity is
// judged on the determinant relative to the row scales.
fn solve_3x3(m: [[Real; 3]; 3], b: [Real; 3]) -> Option<[Real; 3]> {
    let det = |m: &[[Real; 3]; 3]| {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    };
    let d = det(&m);
    let scale: Real = m
        .iter()
        .map(|row| row.iter().fold(0.0, |acc: Real, v| acc.max(v.abs())))
        .product();
    if !d.is_finite() || !scale.is_finite() || scale == 0.0 || close(d / scale, 0.0, EPSILON) {
        return None;
    }
    let mut x = [0.0; 3];
    for (col, xi) in x.iter_mut().enumerate() {
        let mut mc = m;
        for (row, bi) in b.iter().enumerate() {
            mc[row][col] = *bi;
        }
        *xi = det(&mc) / d;
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Smile-adjusted barrier price with its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VannaVolgaBarrierPrice {
    /// Adjusted present value, floored at zero.
    pub price: Price,
    /// Reiner-Rubinstein price at the ATM volatility.
    pub flat_price: Price,
    /// Smile-consistent vanilla price.
    pub vanilla_price: Price,
    /// Continuous no-touch probability at the ATM volatility.
    pub survival_probability: Probability,
}

/// Vanna-Volga barrier price.
///
/// `V = V_RR(σ_ATM) + w·(C_VV − C_BS)`, with `w` the no-touch probability
/// for knock-outs and one minus it for knock-ins.
#[allow(clippy::too_many_arguments)]
pub fn vanna_volga_barrier_price(
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Price,
    strike: Price,
    barrier: Price,
    domestic_rate: Rate,
    foreign_rate: Rate,
    maturity: Time,
    quote: VannaVolgaQuote,
) -> VannaVolgaBarrierPrice {
    let pricer = VannaVolgaPricer::new(quote);
    let atm = quote.atm_vol();
    let vanilla_price =
        pricer.smile_price(option_type, spot, strike, maturity, domestic_rate, foreign_rate);
    let flat_vanilla = garman_kohlhagen(
        option_type,
        spot,
        strike,
        domestic_rate,
        foreign_rate,
        atm,
        maturity,
    )
    .price;
    let flat_price = analytic_barrier_price(
        option_type,
        barrier_type,
        spot,
        strike,
        barrier,
        domestic_rate,
        foreign_rate,
        atm,
        maturity,
    );
    let survival_probability = barrier_survival_probability(
        barrier_type,
        spot,
        barrier,
        domestic_rate,
        foreign_rate,
        atm,
        maturity,
    );
    let weight = if barrier_type.is_knock_out() {
        survival_probability
    } else {
        1.0 - survival_probability
    };

    VannaVolgaBarrierPrice {
        price: (flat_price + weight * (vanilla_price - flat_vanilla)).max(0.0),
        flat_price,
        vanilla_price,
        survival_probability,
    }
}

/// Analytic barrier engine with a Vanna-Volga smile correction.
///
/// The contract's own volatility is ignored in favour of the quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VannaVolgaBarrierEngine {
    quote: VannaVolgaQuote,
}

impl VannaVolgaBarrierEngine {
    /// Engine for the given market quote.
    pub fn new(quote: VannaVolgaQuote) -> Self {
        Self { quote }
    }
}

impl PricingEngine<BarrierContract> for VannaVolgaBarrierEngine {
    fn calculate(&self, args: &BarrierContract) -> Result<PricingResults> {
        let r = vanna_volga_barrier_price(
            args.option_type(),
            args.barrier_type(),
            args.spot(),
            args.strike(),
            args.barrier(),
            args.domestic_rate(),
            args.foreign_rate(),
            args.maturity(),
            self.quote,
        );
        Ok(PricingResults::from_npv(r.price)
            .with_result("flat_npv", r.flat_price)
            .with_result("vanilla_npv", r.vanilla_price)
            .with_result("survival_probability", r.survival_probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic_barrier_engine::AnalyticBarrierEngine;

    // spot, r_d, r_f, t; smile 20% ATM, 3% RR, 1% BF
    const S: Real = 100.0;
    const RD: Real = 0.05;
    const RF: Real = 0.02;
    const T: Real = 1.0;

    fn quote() -> VannaVolgaQuote {
        VannaVolgaQuote::new(0.20, 0.03, 0.01).unwrap()
    }

    fn vv(option_type: OptionType, strike: Real) -> Real {
        VannaVolgaPricer::new(quote()).smile_price(option_type, S, strike, T, RD, RF)
    }

    // Flat 30% on the contract; the smile engines must not see it.
    fn contract(barrier_type: BarrierType, barrier: Real) -> BarrierContract {
        BarrierContract::builder(OptionType::Call, barrier_type, S, 100.0, barrier, T)
            .with_volatility(0.3)
            .with_rates(RD, RF)
            .build()
            .unwrap()
    }

    fn gk(option_type: OptionType, strike: Real, vol: Real) -> Real {
        garman_kohlhagen(option_type, S, strike, RD, RF, vol, T).price
    }

    #[test]
    fn wing_vols() {
        let q = quote();
        assert!((q.call_wing_vol() - 0.225).abs() < 1e-15);
        assert!((q.put_wing_vol() - 0.195).abs() < 1e-15);
    }

    #[test]
    fn quote_rejects_negative_wing() {
        assert!(VannaVolgaQuote::new(0.05, 0.2, 0.0).is_err());
        assert!(VannaVolgaQuote::new(0.0, 0.0, 0.0).is_err());
        assert!(VannaVolgaQuote::new(0.1, Real::NAN, 0.0).is_err());
    }

    #[test]
    fn pillar_strikes() {
        let p = VannaVolgaPricer::new(quote()).pillars(S, T, RD, RF);
        let expected = [92.36424096588162, 105.12710963760242, 122.57044172365666];
        for (pillar, k) in p.iter().zip(expected) {
            assert!((pillar.strike - k).abs() < 1e-8, "{} vs {k}", pillar.strike);
        }
    }

    #[test]
    fn pillars_reprice_to_market() {
        let pricer = VannaVolgaPricer::new(quote());
        for p in pricer.pillars(S, T, RD, RF) {
            let smile = vv(OptionType::Call, p.strike);
            let market = gk(OptionType::Call, p.strike, p.volatility);
            assert!((smile - market).abs() < 1e-8, "K={}: {smile} vs {market}", p.strike);
        }
    }

    #[test]
    fn reference_values() {
        let cases = [
            (90.0, 15.004825760818056),
            (100.0, 9.084246105241958),
            (110.0, 5.395024767034193),
            (120.0, 3.3765366782316053),
        ];
        for (k, expected) in cases {
            let p = vv(OptionType::Call, k);
            assert!((p - expected).abs() < 1e-8, "K={k}: {p} vs {expected}");
        }
    }

    #[test]
    fn flat_smile_is_garman_kohlhagen() {
        let pricer = VannaVolgaPricer::new(VannaVolgaQuote::new(0.2, 0.0, 0.0).unwrap());
        for k in [80.0, 100.0, 125.0] {
            let p = pricer.smile_price(OptionType::Put, S, k, T, RD, RF);
            assert!((p - gk(OptionType::Put, k, 0.2)).abs() < 1e-10, "K={k}");
        }
    }

    #[test]
    fn smile_prices_keep_put_call_parity() {
        for k in [80.0, 95.0, 110.0, 130.0] {
            let forward = S * (-RF * T).exp() - k * (-RD * T).exp();
            let diff = vv(OptionType::Call, k) - vv(OptionType::Put, k);
            assert!((diff - forward).abs() < 1e-10, "K={k}: {diff} vs {forward}");
        }
    }

    #[test]
    fn pricer_ignores_flat_volatility() {
        let pricer = VannaVolgaPricer::new(quote());
        let a = pricer.vanilla_price(S, 110.0, T, 0.1, RD, RF, OptionType::Call);
        let b = pricer.vanilla_price(S, 110.0, T, 0.4, RD, RF, OptionType::Call);
        assert_eq!(a, b);
        assert_eq!(a, vv(OptionType::Call, 110.0));
    }

    #[test]
    fn expired_is_intrinsic() {
        let pricer = VannaVolgaPricer::new(quote());
        assert_eq!(pricer.smile_price(OptionType::Call, S, 90.0, 0.0, RD, RF), 10.0);
    }

    #[test]
    fn barrier_reference_values() {
        let cases = [
            (OptionType::Call, BarrierType::UpOut, 120.0, 1.0437845278628253),
            (OptionType::Call, BarrierType::UpIn, 120.0, 8.040461577379133),
            (OptionType::Call, BarrierType::DownOut, 90.0, 7.527356649176246),
            (OptionType::Put, BarrierType::DownOut, 90.0, 0.09722812840493766),
            (OptionType::Put, BarrierType::UpIn, 110.0, 1.421921614484423),
        ];
        for (ot, bt, b, expected) in cases {
            let r = vanna_volga_barrier_price(ot, bt, S, 100.0, b, RD, RF, T, quote());
            assert!(
                (r.price - expected).abs() < 1e-8,
                "{bt} {ot} B={b}: {} vs {expected}",
                r.price
            );
        }
    }

    #[test]
    fn barrier_in_plus_out_is_smile_vanilla() {
        for ot in [OptionType::Call, OptionType::Put] {
            for (inn, out, b) in [
                (BarrierType::DownIn, BarrierType::DownOut, 90.0),
                (BarrierType::UpIn, BarrierType::UpOut, 115.0),
            ] {
                let i = vanna_volga_barrier_price(ot, inn, S, 100.0, b, RD, RF, T, quote());
                let o = vanna_volga_barrier_price(ot, out, S, 100.0, b, RD, RF, T, quote());
                assert!(
                    (i.price + o.price - o.vanilla_price).abs() < 1e-10,
                    "{ot} B={b}: in={}, out={}, vanilla={}",
                    i.price,
                    o.price,
                    o.vanilla_price
                );
            }
        }
    }

    #[test]
    fn breached_barrier_uses_smile_vanilla() {
        let at_spot = |bt| {
            vanna_volga_barrier_price(OptionType::Call, bt, S, 100.0, S, RD, RF, T, quote())
        };
        let r = at_spot(BarrierType::DownIn);
        assert_eq!(r.survival_probability, 0.0);
        assert!((r.price - vv(OptionType::Call, 100.0)).abs() < 1e-12);
        assert_eq!(at_spot(BarrierType::DownOut).price, 0.0);
    }

    #[test]
    fn analytic_engine_takes_smile_pricer() {
        let contract = contract(BarrierType::DownIn, S);
        let r = AnalyticBarrierEngine::with_vanilla_pricer(VannaVolgaPricer::new(quote()))
            .calculate(&contract)
            .unwrap();
        assert!((r.npv - 9.084246105241958).abs() < 1e-8, "npv = {}", r.npv);
        assert_eq!(r.result("vanilla_npv"), Some(r.npv));
    }

    #[test]
    fn engine_reports_components() {
        let contract = contract(BarrierType::UpOut, 120.0);
        let r = VannaVolgaBarrierEngine::new(quote()).calculate(&contract).unwrap();
        assert!((r.npv - 1.0437845278628253).abs() < 1e-8, "npv = {}", r.npv);
        assert!((r.result("flat_npv").unwrap() - 1.1324921409971815).abs() < 1e-9);
        assert!((r.result("survival_probability").unwrap() - 0.621378426393312).abs() < 1e-9);
    }
}
