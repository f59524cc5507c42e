//! Frogsim command-line interface.
//!
//! Run FROG trace simulations from TOML configuration files:
//! ```sh
//! frog-cli run job.toml
//! frog-cli validate job.toml
//! frog-cli crystals
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use frog_core::crystal::CrystalKind;

#[derive(Parser)]
#[command(name = "frog-cli")]
#[command(about = "Frogsim: delay-gated FROG spectrogram simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without computing the trace.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the built-in SHG crystal presets.
    Crystals,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Frogsim FROG Simulator");
            println!("======================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let input = config::build_input(&job)?;
            let result = runner::run_simulation(&input)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_trace {
                runner::write_trace_csv(&result, &out_dir.join("trace.csv"), &job)?;
            }
            if job.output.save_json {
                runner::write_trace_json(&result, &out_dir.join("trace.json"), &job)?;
            }
            if job.output.save_field {
                runner::write_field_csv(&result, &out_dir.join("field.csv"))?;
            }
            if job.output.save_spectrum {
                runner::write_spectrum_csv(&result, &out_dir.join("spectrum.csv"))?;
            }

            println!("Simulation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let input = config::build_input(&job)?;
            frog_core::engine::validate(&input)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Crystals => {
            println!("Built-in SHG crystal presets:");
            println!();
            println!("  {:<8} {:>12} {:>20}", "crystal", "d_eff (pm/V)", "PM angle (deg)");
            for kind in CrystalKind::ALL {
                println!(
                    "  {:<8} {:>12.1} {:>20.1}",
                    kind.label(),
                    kind.deff_pm_per_v(),
                    kind.phase_matching_angle_deg()
                );
            }
            println!();
            println!("Custom coefficients: set deff_pm_v in the [crystal] section.");
            Ok(())
        }
    }
}
