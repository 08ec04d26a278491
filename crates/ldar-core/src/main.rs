//! LDAR leak-rate engine CLI.
//!
//! Subcommands:
//! - `check`: resolve, validate and load a program's leak models
//! - `sample`: draw leak rates for one subtype
//! - `fit`: fit a family to an empirical leak-rate file
//! - `daylight`: civil-twilight window for a date and location
//! - `weather`: make sure the weather file is available locally
//!
//! Payloads go to stdout as JSON; logs and errors go to stderr.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ldar_config::{resolve_program, validate_program, Program, ProgramPath, ValidationError};
use ldar_core::daylight::{daylight_with_offset, DEFAULT_UTC_OFFSET_HOURS};
use ldar_core::dist::{fit_dist, DistFamily};
use ldar_core::exit_codes::ExitCode;
use ldar_core::leak::{LeakRateModel, LeakSampler};
use ldar_core::loader::{read_leak_rates, ProgramDistributions};
use ldar_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ldar_core::weather::{ensure_weather_file, EnvS3Fetcher};
use ldar_core::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// LDAR leak-rate distribution engine
#[derive(Parser)]
#[command(name = "ldar-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true, env = "LDAR_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a program file and load every subtype's leak model
    Check(CheckArgs),

    /// Draw leak rates for one subtype
    Sample(SampleArgs),

    /// Fit a distribution family to the first column of a CSV file
    Fit(FitArgs),

    /// Civil-twilight sunrise and sunset in local decimal hours
    Daylight(DaylightArgs),

    /// Ensure the weather file exists, downloading it if needed
    Weather(WeatherArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Program file (falls back to LDAR_PROGRAM, then ./program.yaml)
    #[arg(long)]
    program: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(long)]
    program: Option<PathBuf>,

    /// Subtype identifier
    #[arg(long)]
    subtype: String,

    /// Number of draws
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Exclusive upper bound (> 0); overrides the subtype's max_leak_rate.
    /// Ignored for sample-file subtypes.
    #[arg(long, allow_hyphen_values = true)]
    max_size: Option<f64>,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// CSV file with a header row; the first column is used
    #[arg(long)]
    samples: PathBuf,

    /// Family name (lognorm, norm, expon, gamma, weibull_min)
    #[arg(long)]
    family: String,

    /// Fixed location
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    loc: f64,
}

#[derive(Args, Debug)]
struct DaylightArgs {
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Hours east of UTC for the reported times
    #[arg(long, default_value_t = DEFAULT_UTC_OFFSET_HOURS, allow_hyphen_values = true)]
    utc_offset: f64,
}

#[derive(Args, Debug)]
struct WeatherArgs {
    /// Directory that should hold the weather file
    #[arg(long)]
    dir: PathBuf,

    /// Weather file name (also the object key)
    #[arg(long)]
    file: String,
}

fn main() {
    let cli = Cli::parse();

    let base = LogConfig::from_env(None, cli.global.log_format);
    let level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(base.level.louder()),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(level, cli.global.log_format));

    let result = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Sample(args) => run_sample(args),
        Commands::Fit(args) => run_fit(args),
        Commands::Daylight(args) => run_daylight(args),
        Commands::Weather(args) => run_weather(args),
    };

    let exit_code = match result.and_then(|payload| print_payload(&payload)) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::for_error(&err);
            tracing::error!(code = err.code(), category = %err.category(), "{}", err);
            eprintln!("{}", json!({ "error": err.to_json(), "exit_code": code.code_name() }));
            code
        }
    };
    std::process::exit(exit_code.as_i32());
}

fn print_payload(payload: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/// Resolve, parse and validate the program; returns it with its working dir.
fn load_program(cli_path: Option<&Path>) -> Result<(Program, ProgramPath, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let resolved = resolve_program(cli_path, &cwd)?;
    let (path, working_dir) = match (&resolved.path, resolved.working_dir()) {
        (Some(path), Some(wd)) => (path.clone(), wd),
        _ => return Err(ValidationError::IoError("no program file found".to_string()).into()),
    };
    tracing::debug!(path = %path.display(), source = %resolved.source, "resolved program file");

    let program = Program::from_file(&path)?;
    validate_program(&program)?;
    Ok((program, resolved, working_dir))
}

fn run_check(args: &CheckArgs) -> Result<Value> {
    let (program, resolved, working_dir) = load_program(args.program.as_deref())?;
    let models = ProgramDistributions::load(&program, &working_dir)?;

    let subtypes: serde_json::Map<String, Value> = models
        .iter()
        .map(|(id, st)| -> Result<(String, Value)> {
            Ok((id.clone(), serde_json::to_value(st.model.summary())?))
        })
        .collect::<Result<_>>()?;

    Ok(json!({
        "program": resolved.path,
        "source": resolved.source.to_string(),
        "program_name": program.program_name,
        "working_dir": models.working_dir(),
        "subtypes": subtypes,
    }))
}

fn run_sample(args: &SampleArgs) -> Result<Value> {
    let (program, _, working_dir) = load_program(args.program.as_deref())?;
    let models = ProgramDistributions::load(&program, &working_dir)?;
    let subtype = models.get(&args.subtype).ok_or_else(|| {
        Error::InvalidArgument(format!("unknown subtype: {}", args.subtype))
    })?;

    if let Some(max) = args.max_size {
        if !(max.is_finite() && max > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "--max-size must be finite and > 0, got {}",
                max
            )));
        }
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    // Empirical rates are drawn as-is: no bound, no conversion.
    let (draws, max_size) = match &subtype.model {
        LeakRateModel::Distribution(dist) => {
            let max_size = args.max_size.or(subtype.max_leak_rate);
            let sampler = LeakSampler::new(dist)
                .with_max_size(max_size)
                .with_conversion(subtype.units.clone());
            let draws = (0..args.count)
                .map(|_| sampler.sample(&mut rng))
                .collect::<Result<Vec<f64>>>()?;
            (draws, max_size)
        }
        LeakRateModel::Empirical(_) => {
            let draws = (0..args.count)
                .map(|_| subtype.model.draw(&mut rng))
                .collect::<Result<Vec<f64>>>()?;
            (draws, None)
        }
    };
    tracing::debug!(subtype = %args.subtype, count = draws.len(), seed, "drew leak rates");

    Ok(json!({
        "subtype": args.subtype,
        "seed": seed,
        "max_size": max_size,
        "leak_rates": draws,
    }))
}

fn run_fit(args: &FitArgs) -> Result<Value> {
    let family = DistFamily::lookup(&args.family)?;
    let samples = read_leak_rates(&args.samples)?;
    let dist = fit_dist(Some(&samples), family, args.loc, None, None)?;
    Ok(json!({
        "samples": samples.len(),
        "fit": dist.params(),
        "mean": dist.mean(),
    }))
}

fn run_daylight(args: &DaylightArgs) -> Result<Value> {
    let window = daylight_with_offset(args.date, args.lat, args.lon, args.utc_offset);
    Ok(json!({
        "date": args.date,
        "lat": args.lat,
        "lon": args.lon,
        "utc_offset": args.utc_offset,
        "sunrise": window.map(|w| w.sunrise),
        "sunset": window.map(|w| w.sunset),
    }))
}

fn run_weather(args: &WeatherArgs) -> Result<Value> {
    let path = ensure_weather_file(&args.dir, &args.file, &EnvS3Fetcher)?;
    Ok(json!({ "path": path }))
}
