//! `adterm` command-line binary.

mod args;
mod output;

use std::io::Write;
use std::path::Path;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use adterm_core::{classify, entry_exit_pages, summarize_by_source, SearchTermRow};
use adterm_pipeline::candidate_pipeline::CandidatePipeline;
use adterm_pipeline::config::{load_config, AnalyzerConfig};
use adterm_pipeline::export::{bid_recommendations_csv, negative_keyword_list, negative_keywords};
use adterm_pipeline::pipelines::optimization_digest::OptimizationDigestPipeline;
use adterm_pipeline::search_term_loader::{consolidate_terms, load_search_terms_file};
use adterm_pipeline::traffic_loader::load_traffic_events_file;
use adterm_pipeline::types::ReportQuery;

use args::{AdTermArgs, AnalyzeArgs, Command, ExportArgs, ReportArgs, TrafficArgs};

#[tokio::main]
async fn main() {
    let args = AdTermArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let outcome = match args.command {
        Command::Analyze(a) => analyze(a).await,
        Command::Export(a) => export(a),
        Command::Traffic(a) => traffic(a),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Config with the command-line `--top` applied, plus the consolidated rows.
fn load_report(args: &ReportArgs) -> Result<(AnalyzerConfig, Vec<SearchTermRow>)> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load config")?;
    if let Some(top) = args.top {
        anyhow::ensure!(top >= 1, "--top must be >= 1");
        config.report.top = top;
    }

    let path = path_str(&args.report)?;
    let records = load_search_terms_file(path)
        .with_context(|| format!("Failed to load report {}", args.report.display()))?;
    let rows = consolidate_terms(&records);
    log::info!(
        "loaded {} report lines as {} distinct terms from {}",
        records.len(),
        rows.len(),
        args.report.display()
    );
    Ok((config, rows))
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let load_start = Instant::now();
    let (config, rows) = load_report(&args.report)?;
    let load_ms = load_start.elapsed().as_millis();

    let vocabularies = config.vocabularies();
    let classification = classify(&rows, &vocabularies);
    let negatives = negative_keywords(&classification).len();
    let terms_processed = rows.len();

    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let mut query = ReportQuery::new(format!("analyze-{}", as_of), as_of);
    query.min_impressions = args.min_impressions.unwrap_or(config.report.min_impressions);
    if !args.kind.is_empty() {
        query.kinds = Some(args.kind.clone());
    }

    let pipeline_start = Instant::now();
    let pipeline =
        OptimizationDigestPipeline::with_rows_and_size(rows, vocabularies, config.report.top);
    let result = pipeline.execute(query).await;
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if args.json {
        let digest = output::build_digest_json(
            &result,
            &classification,
            terms_processed,
            negatives,
            pipeline_ms,
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&digest).context("Failed to serialize digest")?
        );
    } else {
        output::print_digest(&result, &classification, terms_processed, load_ms, pipeline_ms);
    }
    Ok(())
}

fn export(args: ExportArgs) -> Result<()> {
    let (config, rows) = load_report(&args.report)?;
    let classification = classify(&rows, &config.vocabularies());

    let bids = bid_recommendations_csv(&classification, config.report.top)
        .context("Failed to build bid CSV")?;
    let mut negatives = negative_keyword_list(&classification);
    if !negatives.is_empty() {
        negatives.push('\n');
    }

    write_or_print(args.bids_out.as_deref(), &bids)?;
    write_or_print(args.negatives_out.as_deref(), &negatives)?;
    Ok(())
}

fn write_or_print(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

fn traffic(args: TrafficArgs) -> Result<()> {
    let path = path_str(&args.events)?;
    let events = load_traffic_events_file(path)
        .with_context(|| format!("Failed to load events {}", args.events.display()))?;

    let sources = summarize_by_source(&events);
    let pages = entry_exit_pages(&events);
    log::info!(
        "{} events across {} sources and {} pages",
        events.len(),
        sources.len(),
        pages.len()
    );

    if args.json {
        let json = output::build_traffic_json(&sources, &pages);
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialize traffic summary")?
        );
    } else {
        output::print_traffic(&sources, &pages);
    }
    Ok(())
}
