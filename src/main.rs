//! tariff-insights entry point: CLI wiring, config loading and report output.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tariff_insights::analysis::{AnalysisOptions, AnalysisReport};
use tariff_insights::config::AnalysisConfig;
use tariff_insights::demo::DemoGenerator;
use tariff_insights::io::export::{export_hourly_csv, export_monthly_csv};
use tariff_insights::io::import::{read_usage_csv, read_weather_csv};
use tariff_insights::tariff::RatePlan;
use tariff_insights::usage::UsageRecord;
use tariff_insights::weather::DailyWeather;

#[derive(Parser)]
#[command(name = "tariff-insights")]
#[command(about = "Compare residential rate plans and summarize electricity usage", long_about = None)]
struct Cli {
    /// Raise log verbosity to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a utility interval-usage export
    Analyze {
        /// Utility export CSV
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Daily weather CSV (date,temp_max,temp_min,temp_mean)
        #[arg(short, long)]
        weather: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Analyze generated usage and weather
    Demo {
        /// Override the generator seed
        #[arg(long)]
        seed: Option<u64>,

        /// First generated day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last generated day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        #[command(flatten)]
        report: ReportArgs,
    },
}

/// Options shared by every subcommand that produces a report.
#[derive(Args)]
struct ReportArgs {
    /// Load thresholds and rates from a TOML file
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (standard, sensitive)
    #[arg(short, long)]
    preset: Option<String>,

    /// Plan the household is on today (flat, tou, tou-super)
    #[arg(long, default_value = "flat")]
    current_plan: RatePlan,

    /// Share of peak usage assumed movable, 0 to 100
    #[arg(long, default_value_t = 20.0)]
    shift_percent: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write monthly plan costs to CSV
    #[arg(long)]
    monthly_out: Option<PathBuf>,

    /// Write hour-of-week averages to CSV
    #[arg(long)]
    hourly_out: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "tariff_insights=debug"
    } else {
        "tariff_insights=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` takes priority, then `--preset`, then the standard preset.
fn load_config(args: &ReportArgs) -> Result<AnalysisConfig> {
    let cfg = if let Some(path) = &args.config {
        AnalysisConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?
    } else if let Some(name) = &args.preset {
        AnalysisConfig::from_preset(name)?
    } else {
        AnalysisConfig::standard()
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }
    Ok(cfg)
}

fn report(
    records: &[UsageRecord],
    weather: &[DailyWeather],
    cfg: &AnalysisConfig,
    args: &ReportArgs,
) -> Result<()> {
    if !(0.0..=100.0).contains(&args.shift_percent) {
        bail!("--shift-percent must be between 0 and 100, got {}", args.shift_percent);
    }
    let options = AnalysisOptions {
        current_plan: args.current_plan,
        shift_percent: args.shift_percent,
    };
    let report = AnalysisReport::build(records, weather, cfg, options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(path) = &args.monthly_out {
        export_monthly_csv(&report.monthly, path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "monthly costs written");
    }
    if let Some(path) = &args.hourly_out {
        export_hourly_csv(&report.hourly, path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "hourly averages written");
    }
    Ok(())
}

fn analyze(file: &Path, weather: Option<&Path>, args: &ReportArgs) -> Result<()> {
    let cfg = load_config(args)?;
    let import = read_usage_csv(file)?;
    if import.records.is_empty() {
        bail!("{} has no usable electric usage rows", file.display());
    }
    info!(
        records = import.records.len(),
        skipped = import.skipped_rows,
        zip = import.account.zip_code.as_deref().unwrap_or("-"),
        "usage export loaded"
    );

    let weather = match weather {
        Some(path) => read_weather_csv(path)?,
        None => Vec::new(),
    };
    report(&import.records, &weather, &cfg, args)
}

fn demo(
    seed: Option<u64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    args: &ReportArgs,
) -> Result<()> {
    let mut cfg = load_config(args)?;
    if let Some(seed) = seed {
        cfg.demo.seed = seed;
    }
    if let Some(start) = start {
        cfg.demo.start_date = start;
    }
    if let Some(end) = end {
        cfg.demo.end_date = end;
    }
    if cfg.demo.end_date < cfg.demo.start_date {
        bail!(
            "demo end date {} is before start date {}",
            cfg.demo.end_date,
            cfg.demo.start_date
        );
    }

    let generator = DemoGenerator::new(&cfg.demo);
    let records = generator.records();
    let weather = generator.weather();
    info!(seed = cfg.demo.seed, records = records.len(), "demo data generated");
    report(&records, &weather, &cfg, args)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Analyze {
            file,
            weather,
            report,
        } => analyze(file, weather.as_deref(), report),
        Commands::Demo {
            seed,
            start,
            end,
            report,
        } => demo(*seed, *start, *end, report),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
