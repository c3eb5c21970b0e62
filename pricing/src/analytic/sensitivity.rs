use ndarray::Array1;

use crate::analytic::black_scholes::{greeks, price};
use crate::common::models::{positive, Greek, OptionParameters};
use crate::error::{Field, PricingError};

pub const DEFAULT_POINTS: usize = 100;

/// Half width of the spot window around the current spot.
const SPOT_WINDOW: f64 = 50.0;
/// Lowest spot a generated grid starts at.
const SPOT_FLOOR: f64 = 1.0;
const VOLATILITY_RANGE: (f64, f64) = (0.05, 1.0);

/// A sampled function of one input: `values[i]` belongs to `grid[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub grid: Array1<f64>,
    pub values: Array1<f64>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid.iter().copied().zip(self.values.iter().copied())
    }
}

fn check_points(nr_points: usize) -> Result<(), PricingError> {
    if nr_points < 2 {
        return Err(PricingError::InvalidGrid(format!(
            "need at least 2 points, got {nr_points}"
        )));
    }
    Ok(())
}

fn check_grid(grid: &Array1<f64>) -> Result<(), PricingError> {
    check_points(grid.len())?;
    if grid.iter().any(|x| !x.is_finite()) {
        return Err(PricingError::InvalidGrid("grid contains non-finite values".into()));
    }
    if grid.windows(2).into_iter().any(|w| w[1] <= w[0]) {
        return Err(PricingError::InvalidGrid("grid must be strictly increasing".into()));
    }
    Ok(())
}

/// `nr_points` spots evenly spaced over [max(1, S - 50), S + 50].
pub fn spot_grid(spot: f64, nr_points: usize) -> Result<Array1<f64>, PricingError> {
    let spot = positive(Field::Spot, spot)?;
    check_points(nr_points)?;
    let lower = (spot - SPOT_WINDOW).max(SPOT_FLOOR);
    Ok(Array1::linspace(lower, spot + SPOT_WINDOW, nr_points))
}

/// `nr_points` volatilities evenly spaced over [5%, 100%].
pub fn volatility_grid(nr_points: usize) -> Result<Array1<f64>, PricingError> {
    check_points(nr_points)?;
    let (lower, upper) = VOLATILITY_RANGE;
    Ok(Array1::linspace(lower, upper, nr_points))
}

fn sample(
    grid: &Array1<f64>,
    mut value_at: impl FnMut(f64) -> Result<f64, PricingError>,
) -> Result<Curve, PricingError> {
    check_grid(grid)?;
    let values = grid
        .iter()
        .map(|x| value_at(*x))
        .collect::<Result<Vec<f64>, PricingError>>()?;
    Ok(Curve {
        grid: grid.clone(),
        values: Array1::from(values),
    })
}

/// The option price as the spot moves over `grid`, everything else fixed.
pub fn price_vs_spot(params: &OptionParameters, grid: &Array1<f64>) -> Result<Curve, PricingError> {
    sample(grid, |spot| Ok(price(&params.with_spot(spot)?)))
}

/// The option price as the volatility moves over `grid`, everything else fixed.
pub fn price_vs_volatility(
    params: &OptionParameters,
    grid: &Array1<f64>,
) -> Result<Curve, PricingError> {
    sample(grid, |vola| Ok(price(&params.with_volatility(vola)?)))
}

/// One Greek (raw units) as the spot moves over `grid`.
pub fn greek_vs_spot(
    params: &OptionParameters,
    greek: Greek,
    grid: &Array1<f64>,
) -> Result<Curve, PricingError> {
    sample(grid, |spot| Ok(greeks(&params.with_spot(spot)?).get(greek)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::models::OptionType;
    use crate::error::Constraint;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    fn atm_call() -> OptionParameters {
        OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap()
    }

    #[test]
    fn spot_grid_bounds() {
        let grid = spot_grid(100.0, DEFAULT_POINTS).unwrap();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 50.0);
        assert_approx_eq!(grid[99], 150.0, 1e-12);

        // floored at 1 for small spots
        let grid = spot_grid(20.0, 11).unwrap();
        assert_eq!(grid[0], 1.0);
        assert_approx_eq!(grid[10], 70.0, 1e-12);
    }

    #[test]
    fn volatility_grid_bounds() {
        let grid = volatility_grid(DEFAULT_POINTS).unwrap();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 0.05);
        assert_approx_eq!(grid[99], 1.0, 1e-12);
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(matches!(spot_grid(100.0, 1), Err(PricingError::InvalidGrid(_))));
        assert!(matches!(volatility_grid(0), Err(PricingError::InvalidGrid(_))));
        assert!(matches!(
            spot_grid(-3.0, 10),
            Err(PricingError::InvalidParameter {
                field: Field::Spot,
                constraint: Constraint::Positive,
                ..
            })
        ));
        assert!(matches!(
            spot_grid(f64::INFINITY, 10),
            Err(PricingError::InvalidParameter {
                field: Field::Spot,
                constraint: Constraint::Finite,
                ..
            })
        ));

        let params = atm_call();
        let decreasing = array![120.0, 110.0, 100.0];
        assert!(matches!(
            price_vs_spot(&params, &decreasing),
            Err(PricingError::InvalidGrid(_))
        ));
        let with_nan = array![90.0, f64::NAN, 110.0];
        assert!(matches!(
            price_vs_spot(&params, &with_nan),
            Err(PricingError::InvalidGrid(_))
        ));
    }

    #[test]
    fn invalid_grid_points_fail_without_partial_curve() {
        let params = atm_call();
        let grid = array![-0.1, 0.1, 0.2];
        let err = price_vs_volatility(&params, &grid).unwrap_err();
        assert_eq!(err.field(), Some(Field::Volatility));
    }

    #[test]
    fn call_price_rises_with_spot() {
        let params = atm_call();
        let curve = price_vs_spot(&params, &spot_grid(100.0, DEFAULT_POINTS).unwrap()).unwrap();
        assert_eq!(curve.len(), 100);
        assert!(curve.values.windows(2).into_iter().all(|w| w[1] >= w[0]));

        let (spot, value) = curve.points().nth(50).unwrap();
        assert_approx_eq!(value, price(&params.with_spot(spot).unwrap()), 1e-12);
    }

    #[test]
    fn put_price_rises_with_volatility() {
        let params = atm_call().with_option_type(OptionType::Put);
        let curve = price_vs_volatility(&params, &volatility_grid(50).unwrap()).unwrap();
        assert!(curve.values.windows(2).into_iter().all(|w| w[1] >= w[0]));
    }

    #[test]
    fn delta_curve_stays_in_unit_interval() {
        let params = atm_call();
        let grid = spot_grid(100.0, 25).unwrap();
        let curve = greek_vs_spot(&params, Greek::Delta, &grid).unwrap();
        assert!(curve.values.iter().all(|d| (0.0..=1.0).contains(d)));

        let gamma = greek_vs_spot(&params, Greek::Gamma, &grid).unwrap();
        assert!(gamma.values.iter().all(|g| *g >= 0.0));
    }
}
