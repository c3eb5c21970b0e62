use crate::common::models::{GreekUnits, Greeks, OptionParameters, OptionType, PricingResult};
use probability::distribution::{Continuous, Distribution, Gaussian};

pub(crate) fn cdf(d: f64) -> f64 {
    let normal = Gaussian::new(0.0, 1.0);
    normal.distribution(d)
}

pub(crate) fn pdf(d: f64) -> f64 {
    let normal = Gaussian::new(0.0, 1.0);
    normal.density(d)
}

/// Closed-form valuation of European options.
pub trait OptionPricer {
    type Params;
    fn price(params: &Self::Params) -> f64;
    fn greeks(params: &Self::Params) -> Greeks;
    fn evaluate(params: &Self::Params) -> PricingResult;
}

/// Which form the formula takes for a given set of inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Regime {
    /// T = 0: the option is worth its intrinsic value
    Expired,
    /// σ·√T = 0 with T > 0: the terminal value is known, `weight` replaces N(d1) and N(d2)
    Deterministic { weight: f64 },
    Diffusive { d1: f64, d2: f64, sigma_sqrt_t: f64 },
}

/// 1 above zero, 0 below, 0.5 on the boundary (the limit of N(x / ε) for ε → 0).
fn step(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        0.0
    } else {
        0.5
    }
}

fn regime(dp: &OptionParameters) -> Regime {
    let t = dp.time_to_expiry();
    if t == 0.0 {
        return Regime::Expired;
    }
    let sigma_sqrt_t = dp.volatility() * t.sqrt();
    // ln(F/K) with the forward F = S·e^(rT)
    let log_forward_moneyness = (dp.spot() / dp.strike()).ln() + dp.risk_free_rate() * t;
    if sigma_sqrt_t == 0.0 {
        let weight = step(log_forward_moneyness);
        return Regime::Deterministic { weight };
    }
    // no σ² term: it overflows for σ above ~1e154
    let centre = log_forward_moneyness / sigma_sqrt_t;
    let d1 = centre + sigma_sqrt_t / 2.0;
    let d2 = centre - sigma_sqrt_t / 2.0;
    Regime::Diffusive {
        d1,
        d2,
        sigma_sqrt_t,
    }
}

/// European put and call prices and Greeks for stocks without dividends.
/// https://en.wikipedia.org/wiki/Black-Scholes_model
pub struct BlackScholesMerton;

impl BlackScholesMerton {
    fn price_in(dp: &OptionParameters, regime: Regime) -> f64 {
        let (s, k) = (dp.spot(), dp.strike());
        let disc_strike = k * dp.discount_factor();
        match (regime, dp.option_type()) {
            (Regime::Expired, OptionType::Call) => (s - k).max(0.0),
            (Regime::Expired, OptionType::Put) => (k - s).max(0.0),
            (Regime::Deterministic { weight }, OptionType::Call) => weight * (s - disc_strike),
            (Regime::Deterministic { weight }, OptionType::Put) => {
                (1.0 - weight) * (disc_strike - s)
            }
            (Regime::Diffusive { d1, d2, .. }, OptionType::Call) => {
                cdf(d1) * s - cdf(d2) * disc_strike
            }
            (Regime::Diffusive { d1, d2, .. }, OptionType::Put) => {
                cdf(-d2) * disc_strike - cdf(-d1) * s
            }
        }
    }

    fn greeks_in(dp: &OptionParameters, regime: Regime) -> Greeks {
        let (s, k, t, r) = (
            dp.spot(),
            dp.strike(),
            dp.time_to_expiry(),
            dp.risk_free_rate(),
        );
        let disc_strike = k * dp.discount_factor();

        match regime {
            Regime::Expired => {
                let itm = step(s - k);
                let delta = match dp.option_type() {
                    OptionType::Call => itm,
                    OptionType::Put => itm - 1.0,
                };
                Greeks {
                    delta,
                    gamma: 0.0,
                    vega: 0.0,
                    theta: 0.0,
                    rho: 0.0,
                    units: GreekUnits::Raw,
                }
            }
            Regime::Deterministic { weight } => {
                let (delta, theta, rho) = match dp.option_type() {
                    OptionType::Call => (weight, -r * disc_strike * weight, t * disc_strike * weight),
                    OptionType::Put => (
                        weight - 1.0,
                        r * disc_strike * (1.0 - weight),
                        -t * disc_strike * (1.0 - weight),
                    ),
                };
                Greeks {
                    delta,
                    gamma: 0.0,
                    vega: 0.0,
                    theta,
                    rho,
                    units: GreekUnits::Raw,
                }
            }
            Regime::Diffusive {
                d1,
                d2,
                sigma_sqrt_t,
            } => {
                let density = pdf(d1);
                let sqrt_t = t.sqrt();
                let time_decay = -(s * density * dp.volatility()) / (2.0 * sqrt_t);
                let (delta, theta, rho) = match dp.option_type() {
                    OptionType::Call => (
                        cdf(d1),
                        time_decay - r * disc_strike * cdf(d2),
                        t * disc_strike * cdf(d2),
                    ),
                    OptionType::Put => (
                        cdf(d1) - 1.0,
                        time_decay + r * disc_strike * cdf(-d2),
                        -t * disc_strike * cdf(-d2),
                    ),
                };
                Greeks {
                    delta,
                    gamma: density / (s * sigma_sqrt_t),
                    vega: s * density * sqrt_t,
                    theta,
                    rho,
                    units: GreekUnits::Raw,
                }
            }
        }
    }
}

impl OptionPricer for BlackScholesMerton {
    type Params = OptionParameters;

    fn price(dp: &OptionParameters) -> f64 {
        Self::price_in(dp, regime(dp))
    }

    fn greeks(dp: &OptionParameters) -> Greeks {
        Self::greeks_in(dp, regime(dp))
    }

    fn evaluate(dp: &OptionParameters) -> PricingResult {
        let regime = regime(dp);
        PricingResult::new(Self::price_in(dp, regime), Self::greeks_in(dp, regime))
    }
}

/// The theoretical value of the option.
pub fn price(params: &OptionParameters) -> f64 {
    BlackScholesMerton::price(params)
}

/// Delta, gamma, vega, theta and rho in raw units (see [`GreekUnits::Raw`]).
pub fn greeks(params: &OptionParameters) -> Greeks {
    BlackScholesMerton::greeks(params)
}

/// Price and Greeks from a single evaluation of d1 and d2.
pub fn evaluate(params: &OptionParameters) -> PricingResult {
    BlackScholesMerton::evaluate(params)
}
