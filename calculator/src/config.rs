use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use pricing::{OptionParameters, OptionType, PricingError};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_SPOT: f64 = 100.0;
pub const DEFAULT_STRIKE: f64 = 100.0;
pub const DEFAULT_TIME_TO_EXPIRY: f64 = 1.0;
pub const DEFAULT_RATE_PERCENT: f64 = 5.0;
pub const DEFAULT_VOLATILITY_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionTypeArg {
    /// the right to buy at the strike
    Call,
    /// the right to sell at the strike
    Put,
}

impl From<OptionTypeArg> for OptionType {
    fn from(arg: OptionTypeArg) -> Self {
        match arg {
            OptionTypeArg::Call => OptionType::Call,
            OptionTypeArg::Put => OptionType::Put,
        }
    }
}

/// Market inputs shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Current stock price ($)
    #[arg(long, allow_negative_numbers = true)]
    pub spot: Option<f64>,

    /// Strike price ($)
    #[arg(long, allow_negative_numbers = true)]
    pub strike: Option<f64>,

    /// Time to expiration in years, e.g. 0.5 for 6 months
    #[arg(long, allow_negative_numbers = true)]
    pub expiry: Option<f64>,

    /// Risk-free rate (%), continuously compounded
    #[arg(long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Volatility (%), standard deviation of annual returns
    #[arg(long, allow_negative_numbers = true)]
    pub vol: Option<f64>,

    /// Option type
    #[arg(long = "type", value_enum)]
    pub option_type: Option<OptionTypeArg>,

    /// TOML file with default inputs; flags given on the command line win
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Defaults read from a `--config` file.
///
/// ```toml
/// spot = 250.0
/// strike = 260.0
/// time_to_expiry = 0.5
/// rate_percent = 4.5
/// volatility_percent = 30.0
/// option_type = "put"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub spot: Option<f64>,
    pub strike: Option<f64>,
    pub time_to_expiry: Option<f64>,
    pub rate_percent: Option<f64>,
    pub volatility_percent: Option<f64>,
    pub option_type: Option<OptionType>,
}

impl FileConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("invalid calculator config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

impl MarketArgs {
    /// Reads the `--config` file, if any, and merges it with the flags.
    pub fn resolve(&self) -> anyhow::Result<OptionParameters> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(self.resolve_with(&file)?)
    }

    /// Flag > config file > built-in default. Rates and volatilities are given in percent.
    pub fn resolve_with(&self, file: &FileConfig) -> Result<OptionParameters, PricingError> {
        let spot = self.spot.or(file.spot).unwrap_or(DEFAULT_SPOT);
        let strike = self.strike.or(file.strike).unwrap_or(DEFAULT_STRIKE);
        let time_to_expiry = self
            .expiry
            .or(file.time_to_expiry)
            .unwrap_or(DEFAULT_TIME_TO_EXPIRY);
        let rate_percent = self
            .rate
            .or(file.rate_percent)
            .unwrap_or(DEFAULT_RATE_PERCENT);
        let volatility_percent = self
            .vol
            .or(file.volatility_percent)
            .unwrap_or(DEFAULT_VOLATILITY_PERCENT);
        let option_type = self
            .option_type
            .map(OptionType::from)
            .or(file.option_type)
            .unwrap_or(OptionType::Call);

        let params = OptionParameters::builder()
            .spot(spot)
            .strike(strike)
            .time_to_expiry(time_to_expiry)
            .risk_free_rate(rate_percent / 100.0)
            .volatility(volatility_percent / 100.0)
            .option_type(option_type)
            .build()?;
        debug!(?params, "resolved option parameters");
        Ok(params)
    }
}
