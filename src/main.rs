use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use pmtsim::io::{RunLabel, write_integrals, write_truth};
use pmtsim::logging::{LogLevel, init_logging};
use pmtsim::sim::config::DistributionConfig;
use pmtsim::{Energy, ForwardSimulation, RunConfig};

/// Simulate PMT integrals for events on the GEM plane.
///
/// Writes a truth file (`x y` per event) and an integral file
/// (`run event trigger slice channels...` per event) for the position fitter.
#[derive(Parser, Debug)]
#[command(name = "pmtsim", version, about, long_about = None)]
struct Cli {
    /// JSON run configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of events
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Distribution kind: uniform, fixedY or grid
    #[arg(short, long)]
    distribution: Option<String>,

    /// Distribution parameters, comma separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    params: Option<Vec<f64>>,

    /// Deposited energy per event [keV]
    #[arg(short, long)]
    energy: Option<f64>,

    /// Seed for reproducible uniform sampling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run number written to the integral file
    #[arg(long)]
    run: Option<u32>,

    /// Trigger number written to the integral file
    #[arg(long)]
    trigger: Option<u32>,

    /// PMT indices written to the integral file, comma separated
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<usize>>,

    /// Plane-to-PMT-array separation [cm]
    #[arg(long)]
    separation: Option<f64>,

    /// Use the quartic calibration transfer instead of the quadratic one
    #[arg(long)]
    no_rescale: bool,

    /// Truth file path
    #[arg(long)]
    truth_out: Option<PathBuf>,

    /// Integral file path
    #[arg(long)]
    integrals_out: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    if cli.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let sim = ForwardSimulation::new(config).context("Invalid run configuration")?;
    let result = sim.run().context("Forward model failed")?;
    let config = sim.config();

    tracing::info!(
        events = result.num_events(),
        pmts = result.num_pmts(),
        distribution = %config.distribution.kind,
        separation = config.geometry.separation(),
        a_corr = sim.model().calibration_constant(),
        "Simulated events"
    );

    let out = &config.output;
    let truth_path = out
        .truth_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("run{:05}_mc_truth.txt", out.run)));
    let integrals_path = out
        .integrals_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("run{:05}_integrals.txt", out.run)));

    write_truth(&truth_path, &result.positions)?;
    tracing::info!(path = %truth_path.display(), "Wrote truth file");

    let label = RunLabel {
        run: out.run,
        trigger: out.trigger,
    };
    write_integrals(&integrals_path, label, &result.integrals, &out.channels)?;
    tracing::info!(
        path = %integrals_path.display(),
        channels = ?out.channels,
        "Wrote integral file"
    );

    Ok(())
}

fn build_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(count) = cli.count {
        config.num_events = count;
    }
    if let Some(kind) = &cli.distribution {
        config.distribution = DistributionConfig::new(kind, cli.params.clone().unwrap_or_default());
    } else if let Some(params) = &cli.params {
        config.distribution.params = params.clone();
    }
    if let Some(energy) = cli.energy {
        config.energy = Energy::Scalar(energy);
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(run) = cli.run {
        config.output.run = run;
    }
    if let Some(trigger) = cli.trigger {
        config.output.trigger = trigger;
    }
    if let Some(channels) = &cli.channels {
        config.output.channels = channels.clone();
    }
    if let Some(z) = cli.separation {
        config.geometry = config.geometry.with_separation(z)?;
    }
    if cli.no_rescale {
        config.calibration.rescale = false;
    }
    if cli.truth_out.is_some() {
        config.output.truth_path = cli.truth_out.clone();
    }
    if cli.integrals_out.is_some() {
        config.output.integrals_path = cli.integrals_out.clone();
    }

    Ok(config)
}
