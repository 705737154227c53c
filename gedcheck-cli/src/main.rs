use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use gedcheck_cli::logging::{init_logging, LogConfig, LogFormat};
use gedcheck_cli::stages::save_stages;
use gedcheck_core::report::{report_path, write_report_file};
use gedcheck_core::{
    GedcomError, Language, RecordProcessor, RunSummary, StepProfiler, ValidationConfig, Violation,
};

#[derive(Parser)]
#[command(name = "gedcheck", version)]
#[command(about = "Check GEDCOM person and family records for structural rule violations")]
struct Args {
    /// GEDCOM file to check
    input: PathBuf,

    /// Report path (default: <input stem>_syntaxcheck.csv in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report language, overrides the config file
    #[arg(long, value_enum)]
    language: Option<LanguageArg>,

    /// Validation threads, overrides the config file
    #[arg(long)]
    workers: Option<usize>,

    /// Show the rules that would run and exit
    #[arg(long)]
    show_rules: bool,

    /// Print per-step timings
    #[arg(long)]
    profile: bool,

    /// Dump every intermediate pipeline stage as JSON into this directory
    #[arg(long, value_name = "DIR")]
    dump_stages: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Explicit log level, overrides -v/-q and RUST_LOG
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatArg,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    De,
    En,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&log_config(&args)).context("failed to initialize logging")?;

    println!("🌳 gedcheck GEDCOM syntax check");

    let config = load_config(&args)?;
    let processor = RecordProcessor::new(&config);

    if args.show_rules {
        show_rules(&processor, &config);
        return Ok(());
    }

    let bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(path = %args.input.display(), error = %e, "cannot read input");
            eprintln!("❌ Cannot read {}: {e}", args.input.display());
            std::process::exit(1);
        }
    };

    println!("📄 Processing: {}", args.input.display());

    let mut profiler = StepProfiler::new(args.profile);
    let (violations, summary) = match run(&args, &processor, bytes, &mut profiler) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "processing failed");
            eprintln!("❌ Processing failed: {e}");
            std::process::exit(1);
        }
    };

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => report_path(&args.input, Path::new(".")),
    };
    if let Err(e) = profiler.time_step("Write report", || {
        write_report_file(&output_path, &violations, config.language)
    }) {
        eprintln!("❌ Cannot write report {}: {e}", output_path.display());
        std::process::exit(1);
    }

    print_summary(&summary, &output_path);
    profiler.print_summary();

    Ok(())
}

/// Validate the input, dumping stages on request
fn run(
    args: &Args,
    processor: &RecordProcessor,
    bytes: Vec<u8>,
    profiler: &mut StepProfiler,
) -> Result<(Vec<Violation>, RunSummary)> {
    let Some(stages_dir) = &args.dump_stages else {
        let outcome = processor.process_bytes(bytes, profiler)?;
        return Ok((outcome.violations, outcome.summary));
    };

    println!("\n🔬 Pipeline stage dump mode");
    let source = String::from_utf8(bytes).map_err(GedcomError::from)?;
    let stages = processor.process_capture_stages(&source, profiler)?;
    save_stages(&stages, &args.input, stages_dir)?;
    println!("✅ All stages dumped to: {}\n", stages_dir.display());

    Ok((stages.violations, stages.summary))
}

fn load_config(args: &Args) -> Result<ValidationConfig> {
    let mut config = ValidationConfig::load(args.config.as_deref())?;

    if let Some(path) = &args.config {
        println!("📋 Loaded config from: {}", path.display());
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if let Some(language) = args.language {
        config.language = match language {
            LanguageArg::De => Language::De,
            LanguageArg::En => Language::En,
        };
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    Ok(config)
}

fn log_config(args: &Args) -> LogConfig {
    let mut config = LogConfig::from_verbosity(args.verbose, args.quiet)
        .with_format(match args.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_log_file(args.log_file.clone());

    if let Some(level) = args.log_level {
        config = config.with_level(match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        });
    }
    config
}

fn show_rules(processor: &RecordProcessor, config: &ValidationConfig) {
    println!("\n📋 Rules, in the order they run:");
    for name in processor.rule_engine().rule_names() {
        println!("  - {name}");
    }

    let disabled: Vec<_> = config
        .pipeline
        .rules
        .iter()
        .filter(|rule| !rule.enabled)
        .map(|rule| rule.name.as_str())
        .collect();
    if !disabled.is_empty() {
        println!("\n🚫 Disabled: {}", disabled.join(", "));
    }

    println!("\n🌐 Report language: {}", config.language);
    println!("🧵 Workers: {}", config.workers);

    println!("\n📝 Usage Examples:");
    println!("  gedcheck family.ged");
    println!("  gedcheck family.ged -o report.csv --language en");
    println!("  gedcheck family.ged -c rules.yaml --dump-stages stages/");
}

fn print_summary(summary: &RunSummary, output_path: &Path) {
    println!("✅ Check complete");
    println!("📊 Summary:");
    println!("   - Lines: {}", summary.lines);
    println!("   - INDI records: {}", summary.person_records);
    println!("   - FAM records: {}", summary.family_records);
    println!("   - Other records (ignored): {}", summary.skipped_records);
    println!("   - Violations: {}", summary.violations);
    println!("💾 Report saved to: {}", output_path.display());
}
