use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use klima_report::io::text_write::format_cell;
use klima_report::io::{reading_read, table_read};
use klima_report::model::{DisplayOrder, IdentifierMapping};
use klima_report::{Pipeline, PipelineConfig, ReportError, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Report(args) => execute_report(args),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

fn execute_report(args: ReportArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ReportError::MissingInput(args.input));
    }

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if args.warn_dropped_cells {
        config.warn_on_dropped_cells = true;
    }

    let mapping = args.mapping.as_deref().map(load_mapping);
    let order = args
        .display_order
        .as_deref()
        .map(load_display_order)
        .unwrap_or_default();

    let pipeline = Pipeline::new(config, mapping, order);
    let (report, paths) = pipeline.run(&args.input, &args.output_dir)?;
    info!(text = %paths.text.display(), workbook = %paths.workbook.display(), "report written");

    if let Some(readings_path) = &args.readings {
        let readings = reading_read::read_meter_readings(readings_path)?;
        pipeline.write_cross_reference(&report, &readings, &args.output_dir)?;
    }

    if args.json {
        let json = serde_json::json!({
            "period": report.period,
            "units": report.units,
            "statistics": report.statistics,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", report.table.summary_title);
        for (label, value) in &report.table.summary {
            println!("  {label}: {}", format_cell(value));
        }
    }
    Ok(())
}

fn load_mapping(path: &Path) -> IdentifierMapping {
    match table_read::read_identifier_mapping(path) {
        Ok(mapping) => {
            info!(pairs = mapping.len(), "loaded numbering table");
            mapping
        }
        Err(error) => {
            warn!(%error, "continuing without old unit numbers");
            IdentifierMapping::default()
        }
    }
}

fn load_display_order(path: &Path) -> DisplayOrder {
    match table_read::read_display_order(path) {
        Ok(order) => {
            info!(units = order.numbers().len(), "loaded display order");
            order
        }
        Err(error) => {
            warn!(%error, "falling back to alphabetical order");
            DisplayOrder::default()
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Monthly heating/cooling consumption reports from PPD meter exports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the consumption report for one export.
    Report(ReportArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// PPD export, e.g. PPD_01012026_31012026.csv.
    #[arg(long)]
    input: PathBuf,

    /// Directory the period folder is created in.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Old/new unit numbering table.
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Unit numbers in report order, one per line.
    #[arg(long)]
    display_order: Option<PathBuf>,

    /// Prior meter-reading workbook; enables the cross-reference report.
    #[arg(long)]
    readings: Option<PathBuf>,

    /// JSON file overriding the built-in configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Warn about cells left out of column totals.
    #[arg(long)]
    warn_dropped_cells: bool,

    /// Print units and statistics as JSON instead of the summary block.
    #[arg(long)]
    json: bool,
}
