//! MagChess command-line entry point
//!
//! - `magchess run` - interactive session against the simulated board
//! - `magchess calibrate` - sample an empty board into a calibration table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use magchess::core::{init_logging, AppConfig, SensorSettings};
use magchess::runtime::{self, period};
use magchess::sensors::{CalibrationTable, SimulatedBoard};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "magchess", version, about = "Move inference for a magnetic-sensor chessboard")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play on the simulated board, driven by console commands
    Run {
        /// Set up the simulated pieces from black's side
        #[arg(long)]
        flipped: bool,

        /// Seed the simulator noise for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Use this baseline on every square instead of the calibration file
        #[arg(long, value_name = "RAW")]
        uniform_baseline: Option<i64>,
    },
    /// Average samples of an empty board into a calibration table
    Calibrate {
        /// Number of full-board snapshots to average
        #[arg(long, default_value_t = 10)]
        samples: usize,

        /// Write the result to the configured calibration file
        #[arg(long)]
        write: bool,

        /// Idle value of the simulated sensors being measured
        #[arg(long, default_value_t = 32750, value_name = "RAW")]
        baseline: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_path, found) =
        AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging.level)?;
    config.log_summary(&config_path, found);

    match cli.command {
        Command::Run {
            flipped,
            seed,
            uniform_baseline,
        } => {
            config.board.flipped_simulation |= flipped;
            let settings = match uniform_baseline {
                Some(baseline) => {
                    info!("[CALIBRATION] Using uniform baseline {}", baseline);
                    SensorSettings::new(config.sensors.trigger_delta, CalibrationTable::uniform(baseline))
                }
                None => SensorSettings::load(&config.sensors).context("calibration is required to classify squares")?,
            };
            runtime::run_simulation(&config, settings, seed).await?;
        }
        Command::Calibrate {
            samples,
            write,
            baseline,
        } => {
            let source = SimulatedBoard::new(
                CalibrationTable::uniform(baseline),
                config.sensors.trigger_delta,
                config.sensors.simulated_noise,
            );
            let (table, rate) =
                runtime::run_calibration(source, samples, period(config.sensors.acquisition_hz)).await?;

            if let Some(sps) = rate {
                println!("{:.1} samples/s", sps);
            }
            if write {
                table.save(&config.sensors.calibration_file)?;
                println!("calibration written to {}", config.sensors.calibration_file.display());
            } else {
                println!("{}", table.to_json_string()?);
            }
        }
    }

    Ok(())
}
