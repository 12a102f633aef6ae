use anyhow::Result;
use clap::{Parser, Subcommand};
use forecaster::calendar::WeekdayCalendar;
use forecaster::commands::predict;
use forecaster::config::ForecastRunConfig;
use std::path::PathBuf;

const DEFAULT_PREDICTIONS_FILE: &str = "predicted.csv";
const DEFAULT_TRUTH_FILE: &str = "historical.csv";

#[derive(Parser)]
#[command(name = "forecaster")]
#[command(about = "Per-security OLS price forecasting aligned to a trading calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit one regression per security and write the forecast dataset
    Predict {
        /// Directory of per-symbol daily price CSV files
        #[arg(long = "data-dir", value_name = "DIR")]
        data_dir: PathBuf,
        /// First day of the historical training window (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        history_start: String,
        /// First day of the forecast window, one day after the last training day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        forecast_start: String,
        /// Last day of the forecast window (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        forecast_end: String,
        /// Also write the observed prices for the forecast window
        #[arg(long)]
        with_truth: bool,
        /// Destination for the predicted prices
        #[arg(long, value_name = "PATH")]
        predictions_out: Option<PathBuf>,
        /// Destination for the observed prices
        #[arg(long, value_name = "PATH")]
        truth_out: Option<PathBuf>,
        /// File with one market holiday per line (YYYY-MM-DD)
        #[arg(long, value_name = "PATH")]
        holidays: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli.command {
        Commands::Predict {
            data_dir,
            history_start,
            forecast_start,
            forecast_end,
            with_truth,
            predictions_out,
            truth_out,
            holidays,
        } => {
            let config = ForecastRunConfig::new(
                data_dir,
                &history_start,
                &forecast_start,
                &forecast_end,
                with_truth,
                predictions_out.unwrap_or_else(|| PathBuf::from(DEFAULT_PREDICTIONS_FILE)),
                truth_out.unwrap_or_else(|| PathBuf::from(DEFAULT_TRUTH_FILE)),
            )?;

            let calendar = match holidays {
                Some(path) => WeekdayCalendar::from_holiday_file(&path)?,
                None => WeekdayCalendar::new(),
            };

            predict::run(&config, &calendar)?;
        }
    }

    Ok(())
}
