mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::{CurveArgs, GreekCurveArgs, PriceArgs};
use output::OutputFormat;

/// Black-Scholes European option price calculator
#[derive(Parser)]
#[command(
    name = "bsc",
    version,
    about = "Black-Scholes European option price calculator",
    long_about = "Prices European calls and puts on non-dividend paying stocks with the \
                  Black-Scholes-Merton formula, reports the Greeks and tabulates how the \
                  price reacts to the stock price and the volatility."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Option price and Greeks
    Price(PriceArgs),
    /// Option price against the stock price
    SpotCurve(CurveArgs),
    /// Option price against the volatility
    VolCurve(CurveArgs),
    /// A Greek against the stock price
    GreekCurve(GreekCurveArgs),
    /// Print version information
    Version,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Price(args) => commands::run_price(args),
        Commands::SpotCurve(args) => commands::run_spot_curve(args),
        Commands::VolCurve(args) => commands::run_vol_curve(args),
        Commands::GreekCurve(args) => commands::run_greek_curve(args),
        Commands::Version => {
            println!("bsc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            debug!(format = ?cli.output, "rendering output");
            println!("{}", output::format_output(cli.output, &value));
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_market_flags() {
        let cli = Cli::try_parse_from([
            "bsc", "price", "--spot", "120", "--rate", "-0.5", "--type", "put", "--units", "raw",
            "--output", "json",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Price(args) => {
                assert_eq!(args.market.spot, Some(120.0));
                assert_eq!(args.market.rate, Some(-0.5));
                assert_eq!(args.market.option_type, Some(config::OptionTypeArg::Put));
                assert_eq!(args.units, commands::UnitsArg::Raw);
            }
            _ => panic!("expected the price subcommand"),
        }
    }

    #[test]
    fn greek_curve_flags() {
        let cli = Cli::try_parse_from(["bsc", "greek-curve", "--greek", "gamma", "--points", "7"])
            .unwrap();
        match cli.command {
            Commands::GreekCurve(args) => {
                assert_eq!(args.greek, commands::GreekArg::Gamma);
                assert_eq!(args.curve.points, 7);
            }
            _ => panic!("expected the greek-curve subcommand"),
        }
    }

    #[test]
    fn rejects_unknown_option_type() {
        assert!(Cli::try_parse_from(["bsc", "price", "--type", "straddle"]).is_err());
    }
}
