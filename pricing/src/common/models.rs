#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Constraint, Field, PricingError};

pub(crate) const DAYS_PER_YEAR: f64 = 365.0;
pub(crate) const PERCENT: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// the right to buy the asset at the strike
    Call,
    /// the right to sell the asset at the strike
    Put,
}

/// Inputs of a European option valuation.
///
/// A value of this type is always valid: it can only be obtained through
/// [`OptionParameters::new`] or [`OptionParametersBuilder::build`], both of which
/// check every field against its domain.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OptionParameters {
    /// the asset's price at time t
    spot: f64,
    /// the strike or exercise price of the asset
    strike: f64,
    /// (T - t) in years, where T is the time of the option's expiration and t is the current time
    time_to_expiry: f64,
    /// the annualized, continuously compounded risk-free interest rate
    risk_free_rate: f64,
    /// the annualized standard deviation of the stock's returns
    volatility: f64,
    option_type: OptionType,
}

fn finite(field: Field, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            field,
            constraint: Constraint::Finite,
            value,
        })
    }
}

pub(crate) fn positive(field: Field, value: f64) -> Result<f64, PricingError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            field,
            constraint: Constraint::Positive,
            value,
        })
    }
}

fn non_negative(field: Field, value: f64) -> Result<f64, PricingError> {
    if finite(field, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(PricingError::InvalidParameter {
            field,
            constraint: Constraint::NonNegative,
            value,
        })
    }
}

impl OptionParameters {
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            spot: positive(Field::Spot, spot)?,
            strike: positive(Field::Strike, strike)?,
            time_to_expiry: non_negative(Field::TimeToExpiry, time_to_expiry)?,
            risk_free_rate: finite(Field::RiskFreeRate, risk_free_rate)?,
            volatility: non_negative(Field::Volatility, volatility)?,
            option_type,
        })
    }

    pub fn builder() -> OptionParametersBuilder {
        OptionParametersBuilder::default()
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn with_spot(&self, spot: f64) -> Result<Self, PricingError> {
        Ok(Self {
            spot: positive(Field::Spot, spot)?,
            ..*self
        })
    }

    pub fn with_strike(&self, strike: f64) -> Result<Self, PricingError> {
        Ok(Self {
            strike: positive(Field::Strike, strike)?,
            ..*self
        })
    }

    pub fn with_time_to_expiry(&self, time_to_expiry: f64) -> Result<Self, PricingError> {
        Ok(Self {
            time_to_expiry: non_negative(Field::TimeToExpiry, time_to_expiry)?,
            ..*self
        })
    }

    pub fn with_risk_free_rate(&self, risk_free_rate: f64) -> Result<Self, PricingError> {
        Ok(Self {
            risk_free_rate: finite(Field::RiskFreeRate, risk_free_rate)?,
            ..*self
        })
    }

    pub fn with_volatility(&self, volatility: f64) -> Result<Self, PricingError> {
        Ok(Self {
            volatility: non_negative(Field::Volatility, volatility)?,
            ..*self
        })
    }

    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..*self
        }
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }
}

/// Collects the inputs one by one; `risk_free_rate` defaults to 0 and
/// `option_type` to [`OptionType::Call`], everything else is required.
#[derive(Clone, Debug, Default)]
pub struct OptionParametersBuilder {
    spot: Option<f64>,
    strike: Option<f64>,
    time_to_expiry: Option<f64>,
    risk_free_rate: Option<f64>,
    volatility: Option<f64>,
    option_type: Option<OptionType>,
}

impl OptionParametersBuilder {
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    pub fn time_to_expiry(mut self, time_to_expiry: f64) -> Self {
        self.time_to_expiry = Some(time_to_expiry);
        self
    }

    pub fn risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = Some(risk_free_rate);
        self
    }

    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    pub fn build(self) -> Result<OptionParameters, PricingError> {
        OptionParameters::new(
            self.spot.ok_or(PricingError::MissingParameter(Field::Spot))?,
            self.strike
                .ok_or(PricingError::MissingParameter(Field::Strike))?,
            self.time_to_expiry
                .ok_or(PricingError::MissingParameter(Field::TimeToExpiry))?,
            self.risk_free_rate.unwrap_or(0.0),
            self.volatility
                .ok_or(PricingError::MissingParameter(Field::Volatility))?,
            self.option_type.unwrap_or(OptionType::Call),
        )
    }
}

/// The option sensitivities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Theta,
        Greek::Vega,
        Greek::Rho,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Theta => "theta",
            Greek::Vega => "vega",
            Greek::Rho => "rho",
        }
    }
}

/// How vega, theta and rho are scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GreekUnits {
    /// plain partial derivatives: vega per 1.00 of volatility, theta per year, rho per 1.00 of rate
    Raw,
    /// market quoting: vega per vol point, theta per calendar day, rho per rate point
    Quoted,
}

impl GreekUnits {
    /// Rescales a raw value of `greek` into these units.
    pub fn rescale(&self, greek: Greek, raw: f64) -> f64 {
        match (self, greek) {
            (GreekUnits::Raw, _) => raw,
            (GreekUnits::Quoted, Greek::Vega | Greek::Rho) => raw / PERCENT,
            (GreekUnits::Quoted, Greek::Theta) => raw / DAYS_PER_YEAR,
            (GreekUnits::Quoted, Greek::Delta | Greek::Gamma) => raw,
        }
    }

    /// What one unit of `greek` means, for labelling output.
    pub fn describe(&self, greek: Greek) -> &'static str {
        match (self, greek) {
            (_, Greek::Delta) => "per $1 move in spot",
            (_, Greek::Gamma) => "delta change per $1 move in spot",
            (GreekUnits::Raw, Greek::Vega) => "per 1.00 change in volatility",
            (GreekUnits::Raw, Greek::Theta) => "per year",
            (GreekUnits::Raw, Greek::Rho) => "per 1.00 change in rate",
            (GreekUnits::Quoted, Greek::Vega) => "per 1% change in volatility",
            (GreekUnits::Quoted, Greek::Theta) => "per calendar day",
            (GreekUnits::Quoted, Greek::Rho) => "per 1% change in rate",
        }
    }
}

/// First and second order sensitivities of the option price.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Greeks {
    /// dV/dS
    pub delta: f64,
    /// d²V/dS²
    pub gamma: f64,
    /// dV/dσ
    pub vega: f64,
    /// dV/dt, the decay as calendar time passes
    pub theta: f64,
    /// dV/dr
    pub rho: f64,
    pub units: GreekUnits,
}

impl Greeks {
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Theta => self.theta,
            Greek::Vega => self.vega,
            Greek::Rho => self.rho,
        }
    }

    /// Rescales raw Greeks to market quoting; delta and gamma are unchanged.
    pub fn quoted(&self) -> Self {
        match self.units {
            GreekUnits::Quoted => *self,
            GreekUnits::Raw => {
                let quoted = GreekUnits::Quoted;
                Self {
                    vega: quoted.rescale(Greek::Vega, self.vega),
                    theta: quoted.rescale(Greek::Theta, self.theta),
                    rho: quoted.rescale(Greek::Rho, self.rho),
                    units: quoted,
                    ..*self
                }
            }
        }
    }

    pub fn in_units(&self, units: GreekUnits) -> Self {
        match (self.units, units) {
            (GreekUnits::Raw, GreekUnits::Quoted) => self.quoted(),
            (GreekUnits::Quoted, GreekUnits::Raw) => Self {
                vega: self.vega * PERCENT,
                theta: self.theta * DAYS_PER_YEAR,
                rho: self.rho * PERCENT,
                units: GreekUnits::Raw,
                ..*self
            },
            _ => *self,
        }
    }
}

/// The theoretical value together with its sensitivities.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PricingResult {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
    pub units: GreekUnits,
}

impl PricingResult {
    pub fn new(price: f64, greeks: Greeks) -> Self {
        Self {
            price,
            delta: greeks.delta,
            gamma: greeks.gamma,
            vega: greeks.vega,
            theta: greeks.theta,
            rho: greeks.rho,
            units: greeks.units,
        }
    }

    pub fn greeks(&self) -> Greeks {
        Greeks {
            delta: self.delta,
            gamma: self.gamma,
            vega: self.vega,
            theta: self.theta,
            rho: self.rho,
            units: self.units,
        }
    }

    /// The price for presentation, with rounding noise below zero cut off.
    pub fn display_price(&self) -> f64 {
        self.price.max(0.0)
    }

    pub fn in_units(&self, units: GreekUnits) -> Self {
        Self::new(self.price, self.greeks().in_units(units))
    }
}
