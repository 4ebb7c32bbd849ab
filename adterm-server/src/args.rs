//! Command line arguments for `adterm`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use adterm_pipeline::types::RecommendationKind;

/// Turn ad-platform search-term reports into bid, negative-keyword and
/// ad-copy recommendations.
#[derive(Parser, Debug, Clone)]
#[command(name = "adterm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AdTermArgs {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl AdTermArgs {
    /// Effective verbosity: 0 quiet, 1 default, higher is chattier.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a search-terms report and print ranked recommendations
    Analyze(AnalyzeArgs),

    /// Write the bid-change CSV and the negative keyword list
    Export(ExportArgs),

    /// Summarize site traffic by source and entry/exit page
    Traffic(TrafficArgs),
}

/// Options shared by commands that read a search-terms report.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Search-terms report exported from the ad platform (CSV)
    pub report: PathBuf,

    /// Vocabulary and report settings (TOML)
    #[arg(short, long, env = "ADTERM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of recommendations to keep (overrides the config file)
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Print the machine-readable JSON digest
    #[arg(long)]
    pub json: bool,

    /// Last day of the reporting window (default: today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Only show these kinds (comma separated: bid, negative, monitor, ad-copy)
    #[arg(long, value_delimiter = ',')]
    pub kind: Vec<RecommendationKind>,

    /// Minimum impressions for non-converting terms (overrides the config file)
    #[arg(long)]
    pub min_impressions: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Write the bid CSV here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub bids_out: Option<PathBuf>,

    /// Write the negative keyword list here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub negatives_out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TrafficArgs {
    /// Event log (CSV: session_id,kind,path,utm_source,occurred_at)
    pub events: PathBuf,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}
