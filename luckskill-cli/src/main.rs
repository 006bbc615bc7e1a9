mod params;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use luckskill_engine::constants::{DEFAULT_HISTOGRAM_BINS, DEFAULT_SEED};
use luckskill_engine::{EngineConfig, SimulationEngine, TrialParams};
use params::{ParamOverrides, resolve_params};
use reports::{SimulationReport, TrialsSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Trials at the requested luck weight only
    Trials,
    /// Luck-weight sweep with confidence intervals only
    Sweep,
    /// Trials followed by the sweep
    Both,
}

impl RunMode {
    const fn runs_trials(self) -> bool {
        matches!(self, Self::Trials | Self::Both)
    }

    const fn runs_sweep(self) -> bool {
        matches!(self, Self::Sweep | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "luckskill", version)]
#[command(about = "Monte-Carlo estimate of how much luck versus skill decides a top-k selection")]
struct Args {
    /// What to compute: trials at one weight, the weight sweep, or both
    #[arg(long, value_enum, default_value_t = RunMode::Both)]
    mode: RunMode,

    /// Number of applicants in every simulated pool
    #[arg(long)]
    applicants: Option<usize>,

    /// Number of applicants selected per trial
    #[arg(long)]
    selected: Option<usize>,

    /// Share of the composite score attributed to luck, in [0, 1]
    #[arg(long)]
    luck_weight: Option<f64>,

    /// Number of independent trials (per sweep point in sweep mode)
    #[arg(long)]
    simulations: Option<usize>,

    /// Score distribution: uniform or normal
    #[arg(long)]
    distribution: Option<String>,

    /// Mean of the normal distribution
    #[arg(long)]
    loc: Option<f64>,

    /// Standard deviation of the normal distribution
    #[arg(long)]
    scale: Option<f64>,

    /// JSON parameter file; explicit flags take precedence over its values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Base seed for the per-trial random streams
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Size of a dedicated worker pool (defaults to the global pool)
    #[arg(long, conflicts_with = "sequential")]
    threads: Option<usize>,

    /// Run all trials on the main thread
    #[arg(long)]
    sequential: bool,

    /// Histogram bins per distribution in the report
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output (text histograms in the console report)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            applicants: self.applicants,
            selected: self.selected,
            luck_weight: self.luck_weight,
            simulations: self.simulations,
            distribution: self.distribution.clone(),
            loc: self.loc,
            scale: self.scale,
        }
    }

    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default().with_seed(self.seed);
        if self.sequential {
            config.sequential()
        } else if let Some(threads) = self.threads {
            config.with_threads(threads)
        } else {
            config
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start_time = Instant::now();
    let params = resolve_params(args.params.as_deref(), &args.overrides())?;
    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let report = run_simulation(&args, &params)?;
    write_report(&args, &report, start_time)?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🍀 Luck vs. Skill Selection Simulator".bright_cyan().bold());
    println!("{}", "=====================================".cyan());
}

fn run_simulation(args: &Args, params: &TrialParams) -> Result<SimulationReport> {
    let config = args.engine_config();
    let engine = SimulationEngine::new(config);

    let trials = if args.mode.runs_trials() {
        log::info!(
            "running {} trials at luck weight {:.2}",
            params.num_simulations,
            params.luck_weight
        );
        let series = engine
            .run_trials(params)
            .context("failed to run selection trials")?;
        Some(TrialsSection::new(series, args.bins))
    } else {
        None
    };

    let sweep = if args.mode.runs_sweep() {
        log::info!(
            "sweeping luck weight with {} trials per point",
            params.num_simulations
        );
        let points = engine
            .sweep_luck_weight(&params.sweep())
            .context("failed to sweep luck weight")?;
        Some(points)
    } else {
        None
    };

    Ok(SimulationReport::new(params.clone(), config.seed, trials, sweep))
}

fn write_report(args: &Args, report: &SimulationReport, start_time: Instant) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut out, report)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut out, report)?,
        ReportFormat::Csv => reports::generate_csv_report(&mut out, report)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut out, report, start_time.elapsed(), args.verbose)?;
        }
    }

    out.flush().context("failed to flush report output")?;
    Ok(())
}

/// Buffered report sink: the given file, created or truncated, else stdout.
fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => {
            log::debug!("writing report to {}", path.display());
            Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            )
        }
        None => Box::new(stdout()),
    };
    Ok(BufWriter::new(sink))
}
