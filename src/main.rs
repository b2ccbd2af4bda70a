use anyhow::Context;
use clap::Parser;
use log::info;

use loghound::cli::Cli;
use loghound::configuration::{Configuration, ReportFormat};
use loghound::correlator::WindowCorrelator;
use loghound::ingest::LogIngestor;
use loghound::report::ReportEmitter;
use loghound::store::ActivityStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::init();

    let mut builder = Configuration::builder();
    if let Some(path) = &cli.config {
        builder = builder.from_config_file(path)?;
    }
    let config = builder.from_cli(&cli).build()?;

    // Ingestion must finish before any evaluation starts: a cluster can
    // involve events anywhere in a user's history.
    let mut store = ActivityStore::new();
    let ingestor = LogIngestor::new(config.ingest.on_malformed);
    let stats = ingestor
        .ingest_file(&cli.log_file, &mut store)
        .with_context(|| format!("unable to read log file {}", cli.log_file.display()))?;

    info!(
        "ingested {} events from {} ({} lines, {} skipped)",
        stats.events,
        cli.log_file.display(),
        stats.lines,
        stats.skipped
    );

    let correlator = WindowCorrelator::new(config.detection.clone());
    let emitter = ReportEmitter::new(&correlator, config.detection.clone());

    let mut report = emitter.evaluate(&store, &cli.log_file.display().to_string());
    report.metadata.total_events = stats.events as u64;
    report.metadata.malformed_lines = stats.skipped as u64;

    if config.is_verbose() {
        print!("{}", emitter.format_series_dump(&store));
        println!();
    }

    if !config.is_quiet() {
        match config.output.format {
            ReportFormat::Text => print!("{}", emitter.format_text(&report)),
            ReportFormat::Json => println!("{}", report.to_json()?),
            ReportFormat::Markdown => print!("{}", report.to_markdown()),
        }
    }

    if let Some(path) = &cli.output {
        match config.output.format {
            ReportFormat::Text => emitter.save_text(&report, path)?,
            ReportFormat::Json => emitter.save_json(&report, path)?,
            ReportFormat::Markdown => emitter.save_markdown(&report, path)?,
        }
        info!("report written to {}", path.display());
    }

    Ok(())
}
