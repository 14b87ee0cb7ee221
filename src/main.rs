// report-pdf: Compose event report PDFs from club report records

use clap::Parser;
use report_pdf::{
    default_report_filename, generate_bulk, generate_report, load_reports, EngineConfig, Output,
    OutputTarget, ReportData, ReportError, ReportMonth, DEFAULT_BULK_FILENAME,
};
use std::io::Write;
use std::path::{Path, PathBuf};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Compose event report PDFs from club report records")]
struct Args {
    /// Report JSON file: one report object or an array of reports
    input: PathBuf,

    /// Output PDF path (default: <event name>.pdf, or Reports_<month>.pdf for bulk)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the PDF to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    preview: bool,

    /// Only include reports dated in this month (YYYY-MM); always produces a bulk document
    #[arg(long, conflicts_with = "current_month")]
    month: Option<String>,

    /// Only include reports dated in the current month
    #[arg(long)]
    current_month: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replace each report's total with rotaractors + rotary + others
    #[arg(long)]
    recompute_totals: bool,
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ReportError> {
    let args = Args::parse();
    log::debug!("{:?}", args);

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let month = parse_month(&args)?;
    let mut reports = load_input(&args.input)?;
    log::info!("Loaded {} report(s) from {}", reports.len(), args.input.display());

    if let Some(month) = &month {
        reports.retain(|report| month.contains(report));
        log::info!("{} report(s) dated {}", reports.len(), month.label());
    }

    if args.recompute_totals {
        reports.iter_mut().for_each(ReportData::recompute_total);
    }

    let bulk = month.is_some() || reports.len() != 1;
    let target = if args.preview {
        OutputTarget::Preview
    } else {
        let path = args.output.clone().unwrap_or_else(|| {
            PathBuf::from(match (&month, bulk) {
                (Some(month), _) => month.bulk_filename(),
                (None, true) => DEFAULT_BULK_FILENAME.to_string(),
                (None, false) => default_report_filename(&reports[0]),
            })
        });
        OutputTarget::Download(path)
    };

    let output = if bulk {
        generate_bulk(&reports, &target, &config)?
    } else {
        generate_report(&reports[0], &target, &config)?
    };

    match output {
        Output::Saved(path) => {
            println!("✓ Generated: {}", path.display());
            println!("  Reports: {}", reports.len());
            if let Some(month) = &month {
                println!("  Month: {}", month.label());
            }
        }
        Output::Preview(stream) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(stream.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_month(args: &Args) -> Result<Option<ReportMonth>, ReportError> {
    if args.current_month {
        return Ok(Some(ReportMonth::current()));
    }
    args.month.as_deref().map(ReportMonth::parse).transpose()
}

fn load_input(path: &Path) -> Result<Vec<ReportData>, ReportError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ReportError::InputError(format!("{}: {}", path.display(), e)))?;
    load_reports(&content)
}
