//! Waypoint Prep CLI
//!
//! Create waypoint columns for recorded datasets, then apply manual
//! turn-signal fixes.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use waypoint_env::FsStore;
use waypoint_prep::{Preprocessor, RunConfig, Selection};

/// Waypoint preprocessing for driving datasets
#[derive(Parser, Debug)]
#[command(name = "waypoint-prep")]
#[command(about = "Add lookahead waypoint columns and manual turn-signal fixes to frame tables", long_about = None)]
struct Args {
    /// Root directory with one directory per dataset
    #[arg(long)]
    dataset_folder: Option<PathBuf>,

    /// Process only this dataset (default: every dataset in the catalog)
    #[arg(long)]
    dataset_name: Option<String>,

    /// JSON run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Platform description JSON (overrides the config)
    #[arg(long)]
    platform: Option<PathBuf>,

    /// Manual patch list JSON (overrides the config)
    #[arg(long)]
    patches: Option<PathBuf>,

    /// Skip the manual turn-signal fixes
    #[arg(long)]
    no_patches: bool,

    /// JSON summary on stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path).unwrap_or_else(|e| {
            error!("{}", e);
            std::process::exit(1);
        }),
        None => RunConfig::default(),
    };
    if let Some(folder) = args.dataset_folder {
        config.dataset_folder = folder;
    }
    if args.platform.is_some() {
        config.platform = args.platform;
    }
    if args.patches.is_some() {
        config.patches = args.patches;
    }
    if args.no_patches {
        config.apply_patches = false;
    }

    info!("Waypoint Prep v{}", env!("CARGO_PKG_VERSION"));
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("Dataset root: {}", config.dataset_folder.display());

    let store = FsStore::new(config.dataset_folder.clone());
    let prep = Preprocessor::new(store, config).unwrap_or_else(|e| {
        error!("Cannot start: {}", e);
        std::process::exit(1);
    });

    let selection = Selection::from_name(args.dataset_name);
    let summary = prep.run(&selection);
    let failed_count = summary.failed_count();

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        let total = summary.datasets.len() + summary.patched.len();
        if failed_count == 0 {
            info!(
                "✅ {} dataset(s) processed, {} patched",
                summary.datasets.len(),
                summary.patched.len()
            );
        } else {
            error!("❌ {}/{} dataset steps failed!", failed_count, total);
            for report in summary.datasets.iter().filter(|r| !r.passed) {
                error!(
                    "  - {}: {}",
                    report.dataset,
                    report.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
            for report in summary.patched.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} (fixes): {}",
                    report.dataset,
                    report.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for scripting
    if failed_count > 0 {
        std::process::exit(1);
    }
}
