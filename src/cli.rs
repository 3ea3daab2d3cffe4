// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the pacman log file to analyze
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path the plain-text report is written to
    #[arg(short, long)]
    pub report: PathBuf,
}
