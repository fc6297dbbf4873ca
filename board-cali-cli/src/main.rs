//! Board ADC Calibration CLI Application
//!
//! Command-line front end for the board-cali-gen library. Run with no
//! arguments it reads `data.xlsx` and patches `abc.c` in the current
//! directory; flags and an optional TOML file override either side.

use anyhow::{Context, Result};
use board_cali_gen::{
    Generator, GeneratorConfig, MissingMarkerPolicy, PatchOutcome, RecordLayout,
};
use clap::Parser;
use std::path::{Path, PathBuf};

mod config;

/// Board ADC calibration table generator
#[derive(Parser, Debug)]
#[command(name = "board-cali")]
#[command(about = "Generate the board ADC calibration table from a spreadsheet and splice it into C source", long_about = None)]
#[command(version)]
struct Args {
    /// Calibration table (XLSX/XLS/ODS or CSV) [default: data.xlsx]
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Worksheet name (default: first sheet)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// C source file containing the marker region [default: abc.c]
    #[arg(short, long, value_name = "FILE")]
    target: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fractional digits per coefficient [default: 10]
    #[arg(long, value_name = "DIGITS")]
    precision: Option<usize>,

    /// Put each calibration pair on its own line
    #[arg(long)]
    multiline: bool,

    /// Leave the target untouched instead of failing when markers are missing
    #[arg(long)]
    allow_missing_markers: bool,

    /// Print the generated array instead of patching the target
    #[arg(long)]
    dry_run: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Board calibration generator v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using generator library v{}", board_cali_gen::VERSION);

    let config = resolve_config(&args)?;
    let generator = Generator::new(config).context("Invalid generator configuration")?;
    let input = generator.config().input.clone();
    let target = generator.config().target.clone();

    if args.dry_run {
        let report = generator
            .dry_run()
            .with_context(|| format!("Failed to generate calibration table from {:?}", input))?;
        println!("{}", report.fragment);
        log::info!("Generated {} records (dry run, {:?} not modified)", report.records, target);
        return Ok(());
    }

    let report = generator
        .run()
        .with_context(|| format!("Failed to update {:?} from {:?}", target, input))?;

    if !args.quiet {
        match report.outcome {
            Some(PatchOutcome::Patched) => {
                println!("✓ Inserted {} calibration records into {:?}", report.records, target)
            }
            Some(PatchOutcome::Unchanged) => {
                println!("✓ {:?} already up to date ({} records)", target, report.records)
            }
            Some(PatchOutcome::MarkersMissing) => {
                println!("⚠️  Marker region not found in {:?}; nothing inserted", target)
            }
            None => {}
        }
    }

    Ok(())
}

/// Merge the config file (if any) with command line overrides
fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            config::load_config(path)?.into_generator_config(base_dir)
        }
        None => GeneratorConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(sheet) = &args.sheet {
        config.sheet = Some(sheet.clone());
    }
    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    if args.multiline {
        config.layout = RecordLayout::Multiline;
    }
    if args.allow_missing_markers {
        config.on_missing_markers = MissingMarkerPolicy::Ignore;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
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
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
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
