//! UIDIFF command-line interface.
//!
//! Loads two snapshot files, runs the comparison pipeline and prints the
//! classified changes. Exits with 0 when nothing critical or potential was
//! found, 1 when something was, and 2 on error.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uidiff_rs::{
    filter_report, format_report, load_config, load_snapshot, Classification, ComparisonMode,
    Config, FilterConfig, FingerprintMatcher, OutputFormat, OutputOptions, Pipeline,
    SelectorStructureAnalyzer,
};

/// UIDIFF - Change detection for rendered UI snapshots
///
/// Compares a baseline and a current DOM snapshot and classifies every
/// difference as critical, potential, cosmetic or noise.
#[derive(Parser)]
#[command(name = "uidiff-rs")]
#[command(version)]
#[command(about = "Change detection for rendered UI snapshots", long_about = None)]
#[command(author = "UIDIFF Contributors")]
struct Cli {
    /// Baseline snapshot (JSON or YAML)
    #[arg(value_name = "BASELINE")]
    baseline: PathBuf,

    /// Current snapshot (JSON or YAML)
    #[arg(value_name = "CURRENT")]
    current: PathBuf,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How elements are paired
    #[arg(short, long, value_enum, default_value = "matched")]
    mode: ModeArg,

    /// Stop after this many changes
    #[arg(long)]
    max_changes: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Hide changes below this tier
    #[arg(long, value_enum)]
    min_classification: Option<ClassificationArg>,

    /// Hide changes whose selector contains this text (repeatable)
    #[arg(long = "ignore-selector", value_name = "SELECTOR")]
    ignore_selectors: Vec<String>,

    /// Do not report added or removed elements
    #[arg(long)]
    no_structural: bool,

    /// Maximum length for displayed values
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only show changes, suppress summary)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ModeArg {
    /// Pair elements by selector, id or class
    Identity,
    /// Pair elements with the fingerprint matcher
    Matched,
    /// Matched, plus structural context and timing
    Structural,
}

impl From<ModeArg> for ComparisonMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Identity => ComparisonMode::Identity,
            ModeArg::Matched => ComparisonMode::Matched,
            ModeArg::Structural => ComparisonMode::Structural,
        }
    }
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ClassificationArg {
    Noise,
    Cosmetic,
    Potential,
    Critical,
}

impl From<ClassificationArg> for Classification {
    fn from(arg: ClassificationArg) -> Self {
        match arg {
            ClassificationArg::Noise => Classification::Noise,
            ClassificationArg::Cosmetic => Classification::Cosmetic,
            ClassificationArg::Potential => Classification::Potential,
            ClassificationArg::Critical => Classification::Critical,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => Config::default(),
    };
    if cli.max_changes.is_some() {
        config.max_changes = cli.max_changes;
    }
    if cli.no_structural {
        config.structural_detection = false;
    }

    debug!(path = %cli.baseline.display(), "loading baseline");
    let baseline = load_snapshot(&cli.baseline)
        .with_context(|| format!("Failed to load baseline: {}", cli.baseline.display()))?;

    debug!(path = %cli.current.display(), "loading current snapshot");
    let current = load_snapshot(&cli.current)
        .with_context(|| format!("Failed to load current snapshot: {}", cli.current.display()))?;

    let pipeline = Pipeline::new(&config).context("Invalid configuration")?;
    let mut report = pipeline.run(
        cli.mode.into(),
        &baseline,
        &current,
        &FingerprintMatcher::new(),
        &SelectorStructureAnalyzer::new(),
    );

    let mut filter = FilterConfig::new();
    if let Some(min) = cli.min_classification {
        filter = filter.min_classification(min.into());
    }
    for selector in &cli.ignore_selectors {
        filter = filter.ignore_selector(selector);
    }
    filter_report(&mut report, &filter);

    let output_options = OutputOptions {
        show_values: true,
        max_value_length: cli.max_value_length,
        show_summary: !cli.quiet,
    };
    let output_format: OutputFormat = cli.format.into();
    let output = format_report(&report, &output_format, &output_options)
        .context("Failed to format report")?;
    println!("{}", output);

    let significant =
        report.count(Classification::Critical) + report.count(Classification::Potential);
    if significant == 0 {
        Ok(0)
    } else {
        Ok(1)
    }
}
