// src/renderer.rs

use crate::error::AnalyzerError;
use crate::model::{Analysis, LogSource};
use chrono::Local;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

const UNSET: &str = "-";

pub fn write_report(analysis: &Analysis, report_path: &Path) -> Result<(), AnalyzerError> {
    let file = File::create(report_path).map_err(|source| AnalyzerError::Output {
        path: report_path.to_path_buf(),
        source,
    })?;
    info!(path = %report_path.display(), "writing report");

    let mut writer = BufWriter::new(file);
    render(analysis, &mut writer).map_err(|source| AnalyzerError::Output {
        path: report_path.to_path_buf(),
        source,
    })
}

fn render(analysis: &Analysis, out: &mut impl Write) -> io::Result<()> {
    let counters = &analysis.counters;

    writeln!(out, "Pacman Packages Report")?;
    writeln!(out, "----------------------")?;
    writeln!(
        out,
        "- Generated          : {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "- Installed packages : {}", counters.installed)?;
    writeln!(out, "- Removed packages   : {}", counters.removed)?;
    writeln!(out, "- Upgraded packages  : {}", counters.upgraded)?;
    writeln!(out, "- Current installed  : {}", counters.currently_installed)?;

    writeln!(out, "-------------")?;
    writeln!(out, "General Stats")?;
    writeln!(out, "-------------")?;
    writeln!(
        out,
        "- Oldest package               : {}",
        or_unset(&counters.oldest_package)
    )?;
    writeln!(
        out,
        "- Newest package               : {}",
        or_unset(&counters.newest_package)
    )?;
    writeln!(
        out,
        "- Packages with no upgrades    : {}",
        no_upgrade_list(analysis)
    )?;
    for source in [LogSource::AlpmScriptlet, LogSource::Alpm, LogSource::Pacman] {
        writeln!(
            out,
            "- {:<28} : {}",
            format!("{} log count", source.label()),
            counters.lines_from(source)
        )?;
    }

    writeln!(out, "----------------")?;
    writeln!(out, "List of packages")?;
    writeln!(out, "----------------")?;

    // Sorted for reproducible reports; table order itself is meaningless
    let mut records: Vec<_> = analysis.table.iter().collect();
    records.sort_unstable_by(|a, b| a.name.cmp(&b.name));

    for record in records {
        writeln!(out, "- Package Name           : {}", record.name)?;
        writeln!(
            out,
            "\t- Install date       : {}",
            or_unset(&record.install_date)
        )?;
        writeln!(
            out,
            "\t- Last upgrade date  : {}",
            or_unset(&record.last_update_date)
        )?;
        writeln!(out, "\t- Number of upgrades : {}", record.upgrade_count)?;
        writeln!(
            out,
            "\t- Removal date       : {}",
            or_unset(&record.removal_date)
        )?;
        writeln!(out)?;
    }

    out.flush()
}

fn or_unset(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(UNSET)
}

fn no_upgrade_list(analysis: &Analysis) -> String {
    let names = analysis.table.packages_without_upgrades();
    if names.is_empty() {
        UNSET.to_string()
    } else {
        names.join(", ")
    }
}
