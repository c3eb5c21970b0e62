pub mod black_scholes;
pub mod sensitivity;

pub use black_scholes::{evaluate, greeks, price, BlackScholesMerton, OptionPricer};
