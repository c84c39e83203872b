//! Toxic Rain entry point
//!
//! Runs the reference batch and prints the mean number of pods hitting the
//! target. `TOXIC_RAIN_*` environment variables override the run settings.

use std::error::Error as _;

use toxic_rain::{HitRateSimulation, OutputFormat, SimResult, SimulationSettings, ToxicRainParams};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let settings = SimulationSettings::from_env()?;
    let params = ToxicRainParams::default();
    log::info!(
        "Toxic Rain starting: {} trials, {} workers, {} containment",
        settings.trials,
        settings.workers,
        settings.containment.as_str()
    );

    let simulation = HitRateSimulation::new(&params, &settings)?;

    match settings.format {
        OutputFormat::Plain => {
            let mean = simulation.estimate(settings.trials)?;
            println!("{mean:?}");
        }
        OutputFormat::Json => {
            let summary = simulation.summarize(settings.trials)?;
            println!("{}", summary.to_json()?);
        }
    }

    log::info!("Toxic Rain finished (seed {})", simulation.seed());
    Ok(())
}
