use clap::{Args, ValueEnum};
use pricing::analytic::sensitivity::{
    greek_vs_spot, price_vs_spot, price_vs_volatility, spot_grid, volatility_grid, Curve,
    DEFAULT_POINTS,
};
use pricing::{evaluate, Greek, GreekUnits, OptionParameters, PricingResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::MarketArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    /// vega per 1.00 of volatility, theta per year, rho per 1.00 of rate
    Raw,
    /// vega per vol point, theta per day, rho per rate point
    Quoted,
}

impl From<UnitsArg> for GreekUnits {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Raw => GreekUnits::Raw,
            UnitsArg::Quoted => GreekUnits::Quoted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GreekArg {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl From<GreekArg> for Greek {
    fn from(arg: GreekArg) -> Self {
        match arg {
            GreekArg::Delta => Greek::Delta,
            GreekArg::Gamma => Greek::Gamma,
            GreekArg::Theta => Greek::Theta,
            GreekArg::Vega => Greek::Vega,
            GreekArg::Rho => Greek::Rho,
        }
    }
}

/// Arguments for pricing a single option
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Units of vega, theta and rho
    #[arg(long, value_enum, default_value = "quoted")]
    pub units: UnitsArg,
}

/// Arguments for a price curve
#[derive(Args, Debug)]
pub struct CurveArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of grid points
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    pub points: usize,
}

/// Arguments for a Greek curve
#[derive(Args, Debug)]
pub struct GreekCurveArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Greek to plot against the spot
    #[arg(long, value_enum, default_value = "delta")]
    pub greek: GreekArg,

    /// Units of vega, theta and rho
    #[arg(long, value_enum, default_value = "quoted")]
    pub units: UnitsArg,
}

#[derive(Serialize)]
struct PriceReport {
    #[serde(flatten)]
    inputs: OptionParameters,
    #[serde(flatten)]
    result: PricingResult,
}

pub fn price_report(params: &OptionParameters, units: GreekUnits) -> anyhow::Result<Value> {
    let result = evaluate(params).in_units(units);
    let report = PriceReport {
        inputs: *params,
        result: PricingResult {
            price: result.display_price(),
            ..result
        },
    };
    let mut value = serde_json::to_value(report)?;
    if let Value::Object(map) = &mut value {
        let legend: Map<String, Value> = Greek::ALL
            .iter()
            .map(|g| (format!("{}_unit", g.name()), Value::from(units.describe(*g))))
            .collect();
        map.extend(legend);
    }
    Ok(value)
}

fn curve_rows(curve: &Curve, x_name: &str, y_name: &str, y_scale: impl Fn(f64) -> f64) -> Value {
    Value::Array(
        curve
            .points()
            .map(|(x, y)| {
                let mut row = Map::new();
                row.insert(x_name.to_string(), Value::from(x));
                row.insert(y_name.to_string(), Value::from(y_scale(y)));
                Value::Object(row)
            })
            .collect(),
    )
}

pub fn run_price(args: PriceArgs) -> anyhow::Result<Value> {
    let params = args.market.resolve()?;
    info!(option_type = ?params.option_type(), "pricing option");
    price_report(&params, args.units.into())
}

pub fn run_spot_curve(args: CurveArgs) -> anyhow::Result<Value> {
    let params = args.market.resolve()?;
    let grid = spot_grid(params.spot(), args.points)?;
    info!(points = grid.len(), "price vs spot");
    let curve = price_vs_spot(&params, &grid)?;
    Ok(curve_rows(&curve, "spot", "price", |p| p.max(0.0)))
}

pub fn run_vol_curve(args: CurveArgs) -> anyhow::Result<Value> {
    let params = args.market.resolve()?;
    let grid = volatility_grid(args.points)?;
    info!(points = grid.len(), "price vs volatility");
    let curve = price_vs_volatility(&params, &grid)?;
    // volatility shown in percent, as it is entered
    let percent = Curve {
        grid: curve.grid.mapv(|v| v * 100.0),
        values: curve.values,
    };
    Ok(curve_rows(&percent, "volatility_percent", "price", |p| p.max(0.0)))
}

pub fn run_greek_curve(args: GreekCurveArgs) -> anyhow::Result<Value> {
    let params = args.curve.market.resolve()?;
    let greek: Greek = args.greek.into();
    let units: GreekUnits = args.units.into();
    let grid = spot_grid(params.spot(), args.curve.points)?;
    info!(greek = greek.name(), points = grid.len(), "greek vs spot");
    let curve = greek_vs_spot(&params, greek, &grid)?;
    Ok(curve_rows(&curve, "spot", greek.name(), |raw| {
        units.rescale(greek, raw)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use pricing::OptionType;

    fn atm_call() -> OptionParameters {
        OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap()
    }

    #[test]
    fn price_report_contains_inputs_result_and_units() {
        let report = price_report(&atm_call(), GreekUnits::Quoted).unwrap();
        assert_eq!(report["option_type"], "call");
        assert_eq!(report["spot"], 100.0);
        assert_approx_eq!(report["price"].as_f64().unwrap(), 10.4506, 1e-4);
        assert_approx_eq!(report["delta"].as_f64().unwrap(), 0.6368, 1e-4);
        assert_approx_eq!(report["vega"].as_f64().unwrap(), 0.375240, 1e-5);
        assert_approx_eq!(report["theta"].as_f64().unwrap(), -6.4140 / 365.0, 1e-6);
        assert_eq!(report["units"], "quoted");
        assert_eq!(report["theta_unit"], "per calendar day");
    }

    #[test]
    fn raw_units_are_reported_unscaled() {
        let report = price_report(&atm_call(), GreekUnits::Raw).unwrap();
        assert_approx_eq!(report["vega"].as_f64().unwrap(), 37.5240, 1e-4);
        assert_eq!(report["vega_unit"], "per 1.00 change in volatility");
    }

    #[test]
    fn spot_curve_rows() {
        let args = CurveArgs {
            market: MarketArgs::default(),
            points: 11,
        };
        let rows = run_spot_curve(args).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0]["spot"], 50.0);
        assert!(rows[10]["price"].as_f64().unwrap() > rows[0]["price"].as_f64().unwrap());
    }

    #[test]
    fn vol_curve_is_in_percent() {
        let args = CurveArgs {
            market: MarketArgs::default(),
            points: 20,
        };
        let rows = run_vol_curve(args).unwrap();
        let rows = rows.as_array().unwrap();
        assert_approx_eq!(rows[0]["volatility_percent"].as_f64().unwrap(), 5.0, 1e-12);
        assert_approx_eq!(rows[19]["volatility_percent"].as_f64().unwrap(), 100.0, 1e-12);
    }

    #[test]
    fn greek_curve_applies_units() {
        let make = |units| GreekCurveArgs {
            curve: CurveArgs {
                market: MarketArgs::default(),
                points: 5,
            },
            greek: GreekArg::Theta,
            units,
        };
        let raw = run_greek_curve(make(UnitsArg::Raw)).unwrap();
        let quoted = run_greek_curve(make(UnitsArg::Quoted)).unwrap();
        let raw_theta = raw[2]["theta"].as_f64().unwrap();
        let quoted_theta = quoted[2]["theta"].as_f64().unwrap();
        assert_approx_eq!(quoted_theta * 365.0, raw_theta, 1e-9);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let args = CurveArgs {
            market: MarketArgs::default(),
            points: 1,
        };
        let err = run_spot_curve(args).unwrap_err();
        assert!(err.to_string().contains("invalid grid"));
    }
}
