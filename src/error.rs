// src/error.rs

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("log file [{path}] could not be opened: {source}")]
    Input { path: PathBuf, source: io::Error },

    #[error("report file [{path}] could not be written: {source}")]
    Output { path: PathBuf, source: io::Error },
}
