use std::fmt;

use thiserror::Error;

/// The inputs of an option valuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Spot,
    Strike,
    TimeToExpiry,
    RiskFreeRate,
    Volatility,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Spot => "spot",
            Field::Strike => "strike",
            Field::TimeToExpiry => "time_to_expiry",
            Field::RiskFreeRate => "risk_free_rate",
            Field::Volatility => "volatility",
        };
        f.write_str(name)
    }
}

/// The domain constraint a field has to satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// strictly greater than zero
    Positive,
    /// greater than or equal to zero
    NonNegative,
    /// neither NaN nor infinite
    Finite,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self {
            Constraint::Positive => "must be > 0",
            Constraint::NonNegative => "must be >= 0",
            Constraint::Finite => "must be finite",
        };
        f.write_str(rule)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("invalid {field} = {value}: {constraint}")]
    InvalidParameter {
        field: Field,
        constraint: Constraint,
        value: f64,
    },
    #[error("missing required parameter: {0}")]
    MissingParameter(Field),
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

impl PricingError {
    /// The offending field, if the error concerns a single input.
    pub fn field(&self) -> Option<Field> {
        match self {
            PricingError::InvalidParameter { field, .. } => Some(*field),
            PricingError::MissingParameter(field) => Some(*field),
            PricingError::InvalidGrid(_) => None,
        }
    }
}
