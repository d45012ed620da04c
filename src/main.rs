//! Refinery command line
//!
//! ```bash
//! refinery people.csv                          # inspect only
//! refinery --dedup --impute --to xlsx *.csv    # clean and convert
//! refinery --columns name,age --chart data.xlsx
//! ```
//!
//! Every option can also come from a `REFINERY_*` environment variable.
//! Set `RUST_LOG=debug` (or pass `--verbose`) for detailed logging.

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;
use data_refinery::pipeline::render_chart;
use data_refinery::pipeline::render_preview;
use data_refinery::pipeline::ColumnSelection;
use data_refinery::pipeline::FileReport;
use data_refinery::pipeline::SessionOptions;
use data_refinery::Format;
use data_refinery::UploadedFile;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refinery")]
#[command(about = "Inspect, clean, project, chart and convert CSV and Excel files")]
#[command(version)]
struct Cli {
    /// Files to process (.csv or .xlsx)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Remove duplicate rows
    #[arg(long, env = "REFINERY_DEDUP")]
    dedup: bool,

    /// Fill missing numeric cells with the column mean
    #[arg(long, env = "REFINERY_IMPUTE")]
    impute: bool,

    /// Columns to keep, in order (all columns when omitted, none with "")
    #[arg(long, value_delimiter = ',', env = "REFINERY_COLUMNS")]
    columns: Option<Vec<String>>,

    /// Chart the first two numeric columns
    #[arg(long, env = "REFINERY_CHART")]
    chart: bool,

    /// Convert to this format
    #[arg(long, value_enum, env = "REFINERY_TO")]
    to: Option<FormatArg>,

    /// Directory for converted files
    #[arg(long, default_value = ".", env = "REFINERY_OUT_DIR")]
    out_dir: PathBuf,

    /// Number of rows shown in the preview
    #[arg(long, default_value_t = 5, env = "REFINERY_PREVIEW_ROWS")]
    preview_rows: usize,

    /// Pause before each file, in milliseconds
    #[arg(long, default_value_t = 0, env = "REFINERY_DELAY_MS")]
    delay_ms: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => Format::Csv,
            FormatArg::Xlsx => Format::Xlsx,
        }
    }
}

impl Cli {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            deduplicate: self.dedup,
            impute: self.impute,
            selection: match &self.columns {
                Some(columns) => ColumnSelection::columns(
                    columns.iter().map(|name| name.trim()).filter(|name| !name.is_empty()),
                ),
                None => ColumnSelection::All,
            },
            visualize: self.chart,
            target: self.to.map(Format::from),
            preview_rows: self.preview_rows,
            delay: Duration::from_millis(self.delay_ms),
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = cli.session_options();
    if options.target.is_some() {
        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("cannot create output directory {}", cli.out_dir.display()))?;
    }

    let mut failures = 0usize;
    for path in &cli.files {
        let outcome = UploadedFile::open(path)
            .and_then(|file| data_refinery::process(&file, &options))
            .and_then(|report| print_report(&report, &cli.out_dir));
        if let Err(error) = outcome {
            warn!(path = %path.display(), "skipping file: {}", error);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files could not be processed", failures, cli.files.len());
    }
    Ok(())
}

fn print_report(report: &FileReport, out_dir: &Path) -> Result<(), data_refinery::RefineryError> {
    let inspection = &report.inspection;
    println!("== {}", inspection);
    for (name, kind) in &inspection.schema {
        println!("   {}: {}", name, kind.as_str());
    }
    print!("{}", render_preview(&inspection.preview));

    if report.removed_duplicates > 0 {
        println!("Removed {} duplicate rows", report.removed_duplicates);
    }
    if report.imputed_cells > 0 {
        println!("Filled {} missing values", report.imputed_cells);
    }
    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }
    if let Some(chart) = &report.chart {
        print!("{}", render_chart(chart));
    }
    if let Some(export) = &report.export {
        let path = export.save(out_dir)?;
        println!("Saved {} ({}, {})", path.display(), export.format, export.mime_type);
    }
    println!();
    Ok(())
}
