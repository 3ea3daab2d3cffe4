// src/main.rs

mod analyzer;
mod cli;
mod error;
mod model;
mod renderer;

use clap::Parser;
use cli::Args;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let start_time = Instant::now();

    let analysis = match analyzer::analyze(&args.input) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        packages = analysis.table.len(),
        installed = analysis.counters.installed,
        upgraded = analysis.counters.upgraded,
        removed = analysis.counters.removed,
        "analysis finished in {:.2?}",
        start_time.elapsed()
    );

    if let Err(e) = renderer::write_report(&analysis, &args.report) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    info!("total time: {:.2?}", start_time.elapsed());
    ExitCode::SUCCESS
}
