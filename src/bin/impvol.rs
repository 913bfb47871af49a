// impvol: compute implied and underlying volatility for a quote file.
//
// Usage:
//     impvol <quotes.csv> [--output <output.csv>] [--config <config.toml>] [--plot-dir <dir>]
//
// The quote file is `;`-delimited with a header line. Without --config the
// built-in defaults are used. Log verbosity follows RUST_LOG (default: info).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use impvol_lib::{
    compute_option_records, default_configs, io, plot, PipelineConfig, VolatilitySummary,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq)]
struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    plot_dir: Option<PathBuf>,
}

const USAGE: &str =
    "usage: impvol <quotes.csv> [--output <output.csv>] [--config <config.toml>] [--plot-dir <dir>]";

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut input = None;
    let mut output = PathBuf::from("output.csv");
    let mut config = None;
    let mut plot_dir = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("{flag} needs a value"))
        };
        match arg.as_str() {
            "-o" | "--output" => output = value("--output")?,
            "-c" | "--config" => config = Some(value("--config")?),
            "-p" | "--plot-dir" => plot_dir = Some(value("--plot-dir")?),
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}\n{USAGE}"),
        }
    }

    Ok(Command::Run(Args {
        input: input.ok_or_else(|| anyhow!(USAGE))?,
        output,
        config,
        plot_dir,
    }))
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => default_configs::standard(),
    };

    let quotes = io::read_raw_quotes(&args.input)?;
    info!(quotes = quotes.len(), input = %args.input.display(), "loaded quotes");

    let records = compute_option_records(&quotes, &config)?;
    io::write_option_records(&args.output, &records)?;
    info!(output = %args.output.display(), "saved option records");

    if let Some(dir) = &args.plot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create plot directory {}", dir.display()))?;
        plot::plot_volatility_series(&records, dir.join("volatility.svg"))?;
        plot::plot_volatility_premium(&records, dir.join("volatility_premium.svg"))?;
        info!(dir = %dir.display(), "saved charts");
    }

    print!("{}", VolatilitySummary::from_records(&records));
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(|command| match command {
        Command::Run(args) => run(args),
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
