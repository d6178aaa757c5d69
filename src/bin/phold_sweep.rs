//! Study parameter generator for PHOLD sweeps.
//!
//! Prints or writes the `RUN`/`NUMBER`/`EVENTS` parameter set of a PHOLD
//! study, for submission by a batch workflow tool.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use env_logger::Env;
use log::info;

use pholdsim::log_filter;
use pholdsim::sweep::study::{get_custom_generator, load_study, study_axes, StudyEnvironment};
use pholdsim::sweep::{generate, parse_overrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tab separated table
    Table,
    Json,
    Yaml,
    /// One line of pholdsim flags per run
    Args,
}

#[derive(Parser, Debug)]
#[command(name = "phold-sweep")]
#[command(about = "Generate parameter combinations for a PHOLD study")]
#[command(version)]
struct Cli {
    /// Study YAML file with env variables NUMBER_EXP and EVENTS_EXP
    /// (default: NUMBER_EXP=3, EVENTS_EXP=14)
    #[arg(short, long)]
    env: Option<PathBuf>,

    /// Override a study variable, as NAME:value (repeatable)
    #[arg(short, long = "parg")]
    parg: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Write to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn render(cli: &Cli, env: &StudyEnvironment) -> Result<String> {
    let text = match cli.format {
        Format::Args => {
            let overrides = parse_overrides(cli.parg.as_slice())?;
            let axes = study_axes(env, &overrides)?;
            let lines: Vec<String> = generate(&axes)
                .iter()
                .map(|instance| format!("{}\t{}", instance.run, instance.to_args().join(" ")))
                .collect();
            lines.join("\n")
        }
        Format::Table => get_custom_generator(env, cli.parg.as_slice())?.to_table(),
        Format::Json => serde_json::to_string_pretty(&get_custom_generator(env, cli.parg.as_slice())?)?,
        Format::Yaml => serde_yaml::to_string(&get_custom_generator(env, cli.parg.as_slice())?)?,
    };
    Ok(text)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(cli.verbose))).init();

    let env = match &cli.env {
        Some(path) => load_study(path).wrap_err("Failed to load study environment")?,
        None => StudyEnvironment::with_defaults(),
    };

    let text = render(&cli, &env)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote study parameters to {:?}", path);
        }
        None => println!("{}", text),
    }

    Ok(())
}
