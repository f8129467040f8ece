//! Fit market-impact curves for a list of tickers
//!
//! Usage:
//! ```bash
//! cargo run --release --bin analyze_slippage -- --data data --tickers AMZN,MSFT,GOOG
//! ```
//!
//! Expects one `<TICKER>_lob.csv` per ticker in the data directory and
//! writes one `<TICKER>_slippage_fit.csv` per successful fit.

use anyhow::Result;
use clap::Parser;
use market_impact::{
    analysis::{write_curve_csv, ImpactAnalyzer},
    data::lobster::LobData,
    fit::power_law::FitConfig,
    impact::slippage::SizeGrid,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate market-impact curves from LOB snapshots")]
struct Args {
    /// Directory containing <TICKER>_lob.csv files
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Tickers to analyze
    #[arg(long, value_delimiter = ',', default_value = "AMZN,MSFT,GOOG")]
    tickers: Vec<String>,

    /// Smallest order size in the sweep
    #[arg(long, default_value = "10.0")]
    min_size: f64,

    /// End of the sweep range (exclusive)
    #[arg(long, default_value = "300.0")]
    max_size: f64,

    /// Sweep step
    #[arg(long, default_value = "10.0")]
    step: f64,

    /// Solver iteration cap
    #[arg(long, default_value = "100")]
    max_iterations: usize,

    /// Output directory for fitted-curve CSVs
    #[arg(long, default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let analyzer = ImpactAnalyzer::new(
        SizeGrid::new(args.min_size, args.max_size, args.step),
        FitConfig {
            max_iterations: args.max_iterations,
            ..Default::default()
        },
    );

    for ticker in &args.tickers {
        let path = args.data.join(format!("{ticker}_lob.csv"));
        if !path.exists() {
            warn!("Missing data file: {:?}", path);
            continue;
        }

        let lob = match LobData::load(&path) {
            Ok(lob) => lob,
            Err(e) => {
                warn!("{}: failed to load {:?}: {}", ticker, path, e);
                continue;
            }
        };
        info!("{}: loaded {} LOB rows from {:?}", ticker, lob.len(), path);

        match analyzer.analyze(ticker, &lob) {
            Ok(curve) => {
                info!(
                    "{}: alpha = {:.5}, delta = {:.2} (R^2 = {:.4}, {} valid samples)",
                    ticker, curve.fit.alpha, curve.fit.delta, curve.r_squared, curve.n_valid
                );

                let out = args.output.join(format!("{ticker}_slippage_fit.csv"));
                write_curve_csv(&curve, &out)?;
                info!("Saved curve: {:?}", out);
            }
            Err(e) => {
                warn!("{}: skipping, {}", ticker, e);
            }
        }
    }

    Ok(())
}
