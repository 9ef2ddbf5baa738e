//! Router Stats CLI Application
//!
//! Command-line front end for the rstats-decoder library. It adds what the
//! library deliberately leaves out:
//! - argument parsing and logging bootstrap
//! - text and JSON report rendering
//! - TOML batch configuration
//! - parallel decoding of independent files (each file owns its decoder)

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::path::PathBuf;

use rstats_decoder::report::DEFAULT_USAGE_CAP;
use rstats_decoder::{Decoder, DecoderConfig, Format};

mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::RenderOptions;

/// Router Stats Reader - decode Tomato USB bandwidth stats files
#[derive(Parser, Debug)]
#[command(name = "rstats-cli")]
#[command(about = "Decode Tomato USB router bandwidth stats files (rstats, cstats)", long_about = None)]
#[command(version)]
struct Args {
    /// Stats file(s) to decode (gzip-compressed)
    #[arg(value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Input format (default: detect from the file's magic tags)
    #[arg(short, long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Emit reports as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Include the 2-minute RX/TX speed table (cstats only)
    #[arg(long)]
    speed: bool,

    /// Usage cap in bytes for the recent-usage summary
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_USAGE_CAP)]
    cap: u64,

    /// Path to batch configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Input format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Detect from the buffer's magic tags
    Auto,
    /// Compact whole-router file
    Rstats,
    /// Extended per-IP record stream
    Cstats,
}

impl FormatArg {
    fn to_format(self) -> Option<Format> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Rstats => Some(Format::Compact),
            FormatArg::Cstats => Some(Format::Extended),
        }
    }
}

/// One file to decode plus everything needed to render and place its report
struct Job {
    path: PathBuf,
    decoder: DecoderConfig,
    render: RenderOptions,
    /// Where to write the report; stdout when None
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Router Stats CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", rstats_decoder::VERSION);

    let jobs = if let Some(config_path) = &args.config {
        let app_config = config::load_config(config_path)?;
        jobs_from_config(&app_config)
    } else if !args.input.is_empty() {
        jobs_from_args(&args)
    } else {
        // No arguments - show help
        println!("Router Stats Reader - no input specified");
        println!("\nQuick start:");
        println!("  rstats-cli tomato_rstats.gz");
        println!("  rstats-cli --format cstats --speed tomato_cstats.gz");
        println!("  rstats-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    run(&jobs)
}

fn jobs_from_args(args: &Args) -> Vec<Job> {
    let decoder = match args.format.to_format() {
        Some(format) => DecoderConfig::new().with_format(format),
        None => DecoderConfig::new(),
    };
    let render = RenderOptions {
        json: args.json,
        include_speed: args.speed,
        cap: args.cap,
    };
    args.input
        .iter()
        .map(|path| Job {
            path: path.clone(),
            decoder: decoder.clone(),
            render,
            output: None,
        })
        .collect()
}

fn jobs_from_config(app_config: &AppConfig) -> Vec<Job> {
    let decoder = match app_config.input.format {
        Some(format) => DecoderConfig::new().with_format(format),
        None => DecoderConfig::new(),
    };
    let render = RenderOptions {
        json: app_config.output.format == OutputFormat::Json,
        include_speed: app_config.output.include_speed,
        cap: app_config.output.cap,
    };
    app_config
        .input
        .files
        .iter()
        .map(|path| Job {
            path: path.clone(),
            decoder: decoder.clone(),
            render,
            output: app_config.output.report_path(path),
        })
        .collect()
}

/// Decode every job, independent files in parallel.
///
/// A failing file never stops the batch; failures are reported per file
/// and reflected in the exit status once all files have been attempted.
fn run(jobs: &[Job]) -> Result<()> {
    let results: Vec<Result<Option<String>>> = jobs.par_iter().map(run_job).collect();

    let mut failed = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(Some(rendered)) => println!("{}", rendered),
            Ok(None) => {}
            Err(e) => {
                failed += 1;
                log::error!("{}: {:#}", job.path.display(), e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} file(s) failed to decode", failed, jobs.len());
    }
    Ok(())
}

fn run_job(job: &Job) -> Result<Option<String>> {
    let decoded = Decoder::new()
        .decode_file(&job.path, &job.decoder)
        .with_context(|| format!("decoding {}", job.path.display()))?;
    let rendered = report::render(&decoded, &job.render)?;

    match &job.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            log::info!("wrote {}", path.display());
            Ok(None)
        }
        None => Ok(Some(rendered)),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
