//! Black-Scholes-Merton prices and Greeks for European options on
//! non-dividend paying stocks.
//!
//! ```
//! use pricing::{evaluate, OptionParameters, OptionType};
//!
//! let params = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap();
//! let result = evaluate(&params);
//! assert!((result.price - 10.4506).abs() < 1e-4);
//! ```

pub mod analytic;
pub mod common;
pub mod error;

pub use analytic::{evaluate, greeks, price, BlackScholesMerton, OptionPricer};
pub use common::models::{
    Greek, GreekUnits, Greeks, OptionParameters, OptionParametersBuilder, OptionType,
    PricingResult,
};
pub use error::{Constraint, Field, PricingError};
