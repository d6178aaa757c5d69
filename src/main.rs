use clap::{ArgAction, CommandFactory, Parser};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process;

use pholdsim::backend::locate_engine;
use pholdsim::config::RawBenchmarkArgs;
use pholdsim::config_loader::{self, apply_overrides, CliOverrides};
use pholdsim::orchestrator::{build_plan, write_plan};
use pholdsim::topology::{Topology, TopologyKind};
use pholdsim::utils::validation::validate;
use pholdsim::{log_filter, EXIT_ENGINE_UNAVAILABLE, EXIT_INVALID_CONFIG};

/// Configure the standard PHOLD benchmark for the SST engine
#[derive(Parser, Debug)]
#[command(author, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Fraction of events which should be scheduled for other LPs. Must be in [0,1], default 0.9.
    #[arg(short, long, allow_negative_numbers = true)]
    remote: Option<f64>,

    /// Minimum inter-event delay, in s. Must be > 0, default 1.
    #[arg(short, long, allow_negative_numbers = true)]
    minimum: Option<f64>,

    /// Average additional inter-event delay, in s. Added to the minimum delay, must be >= 0, default 9.
    #[arg(short, long, allow_negative_numbers = true)]
    average: Option<f64>,

    /// Total simulation time, in s. Must be >= 0, default 10.
    #[arg(short, long, allow_negative_numbers = true)]
    stop: Option<f64>,

    /// Total number of LPs. Must be >= 2, default 2.
    #[arg(short, long, allow_negative_numbers = true)]
    number: Option<f64>,

    /// Number of initial events per LP. Must be > 0, default 1.
    #[arg(short, long, allow_negative_numbers = true)]
    events: Option<f64>,

    /// Whether to output the delay histogram
    #[arg(short, long)]
    delays: bool,

    /// Phold module verbosity
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pverbose: u8,

    /// Script verbosity
    #[arg(short = 'V', long = "pyVerbose", action = ArgAction::Count)]
    py_verbose: u8,

    /// YAML file with benchmark parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LP interconnection topology
    #[arg(short, long, value_enum, default_value_t = TopologyKind::Complete)]
    topology: TopologyKind,

    /// Path to the SST executable (default: $SST_BIN, then sst on PATH)
    #[arg(long)]
    engine: Option<String>,

    /// Output directory or .json file for the engine plan
    #[arg(short, long, default_value = "phold_output")]
    output: PathBuf,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            remote: self.remote,
            minimum: self.minimum,
            average: self.average,
            stop: self.stop,
            number: self.number,
            events: self.events,
            delays: self.delays,
            pverbose: self.pverbose,
            py_verbose: self.py_verbose,
        }
    }

    /// Plan file path: `output` itself if it names a .json file, else `output/phold_plan.json`
    fn plan_path(&self) -> PathBuf {
        if self.output.extension().map_or(false, |ext| ext == "json") {
            self.output.clone()
        } else {
            self.output.join("phold_plan.json")
        }
    }
}

/// Raw parameters from the `--config` file (or defaults) with flags applied
fn load_raw(args: &Args) -> Result<RawBenchmarkArgs> {
    let mut raw = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => RawBenchmarkArgs::default(),
    };
    apply_overrides(&mut raw, &args.overrides());
    Ok(raw)
}

/// Validate and report the parameters, then write the engine plan when an
/// engine is available. Returns the process exit status.
fn run(args: &Args, raw: &RawBenchmarkArgs, engine: Option<&Path>) -> Result<i32> {
    let config = match validate(raw) {
        Ok(config) => config,
        Err(failure) => {
            warn!("{} parameter(s) invalid", failure.violations.len());
            Args::command().print_help().wrap_err("Failed to print usage")?;
            return Ok(EXIT_INVALID_CONFIG);
        }
    };
    info!("Configuration: {}", config);
    debug!("Configuration details:\n{}", config.report());

    let Some(engine) = engine else {
        return Ok(EXIT_ENGINE_UNAVAILABLE);
    };

    info!(
        "Building {} topology: {} LPs, {} links",
        args.topology,
        config.number(),
        Topology::expected_edge_count(config.number(), args.topology)
    );
    let plan = build_plan(&config, args.topology).wrap_err("Failed to configure the experiment")?;

    let plan_path = args.plan_path();
    write_plan(&plan, &plan_path)?;

    info!(
        "Wrote engine plan {} for an engine driver; SST found at {}",
        plan_path.display(),
        engine.display()
    );
    Ok(0)
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // The file may raise the script verbosity, so it is read before logging starts
    let raw = load_raw(&args)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(raw.py_verbose))).init();

    info!("Creating PHOLD Benchmark");
    if let Some(path) = &args.config {
        info!("Loaded configuration from: {:?}", path);
    }

    // Without the engine we still validate and report the configuration
    let engine = match locate_engine(args.engine.as_deref()) {
        Ok(path) => {
            info!("Found SST engine at {:?}", path);
            Some(path)
        }
        Err(e) => {
            warn!("{}; just validating the configuration", e);
            None
        }
    };

    let status = run(&args, &raw, engine.as_deref())?;
    if status != 0 {
        process::exit(status);
    }

    info!("Done");
    Ok(())
}
