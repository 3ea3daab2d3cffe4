// src/analyzer.rs

use crate::error::AnalyzerError;
use crate::model::{Analysis, LogSource};
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn analyze(log_path: &Path) -> Result<Analysis, AnalyzerError> {
    let contents = fs::read_to_string(log_path).map_err(|source| AnalyzerError::Input {
        path: log_path.to_path_buf(),
        source,
    })?;
    info!(path = %log_path.display(), "processing logs");

    // 1. Load the whole log up front so the line count is known
    let lines: Vec<&str> = contents.lines().collect();

    let bar = ProgressBar::new(lines.len() as u64);
    bar.set_message("Analyzing log lines");

    // 2. Replay every line strictly in file order
    let mut analysis = Analysis::default();
    for line in &lines {
        process_line(&mut analysis, line);
        bar.inc(1);
    }
    bar.finish_with_message("Analysis complete");

    Ok(analysis)
}

/// One relevant log event, normalized from either timestamp layout
struct LogEvent<'a> {
    timestamp: String,
    source: LogSource,
    action: &'a str,
    package: &'a str,
}

fn process_line(analysis: &mut Analysis, line: &str) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if let Some(event) = classify(&tokens) {
        apply_event(analysis, &event);
    }
}

/// Decides relevance and normalizes the two tolerated line layouts into a
/// single (timestamp, source, action, package) shape. Anything else is noise.
fn classify<'a>(tokens: &[&'a str]) -> Option<LogEvent<'a>> {
    if tokens.len() < 5 {
        return None;
    }

    // Tag at token 2: `[date] [time] [TAG] action package ...`, the
    // timestamp split over two bracketed tokens.
    if let Some(source) = LogSource::from_token(tokens[2]) {
        let date = tokens[0].strip_prefix('[').unwrap_or(tokens[0]);
        let time = tokens[1].strip_suffix(']').unwrap_or(tokens[1]);
        return Some(LogEvent {
            timestamp: format!("{} {}", date, time),
            source,
            action: tokens[3],
            package: tokens[4],
        });
    }

    // Tag at token 1: `[timestamp] [TAG] action package ...`, date and time
    // already merged into one token.
    if let Some(source) = LogSource::from_token(tokens[1]) {
        let stamp = tokens[0].strip_prefix('[').unwrap_or(tokens[0]);
        let stamp = stamp.strip_suffix(']').unwrap_or(stamp);
        return Some(LogEvent {
            timestamp: stamp.to_string(),
            source,
            action: tokens[2],
            package: tokens[3],
        });
    }

    None
}

fn apply_event(analysis: &mut Analysis, event: &LogEvent) {
    let Analysis { table, counters } = analysis;

    // Source counts cover every relevant line, even unrecognized actions
    counters.count_line(event.source);

    match event.action {
        "installed" | "reinstalled" => {
            counters.installed += 1;
            counters.currently_installed += 1;
            if counters.oldest_package.is_none() {
                counters.oldest_package = Some(event.package.to_string());
            }
            table.record_install(event.package, &event.timestamp);
            counters.newest_package = Some(event.package.to_string());
        }
        "upgraded" => {
            counters.upgraded += 1;
            table.record_upgrade(event.package, &event.timestamp);
            counters.newest_package = Some(event.package.to_string());
        }
        "removed" => {
            counters.removed += 1;
            counters.currently_installed -= 1;
            table.record_removal(event.package, &event.timestamp);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> Analysis {
        let mut analysis = Analysis::default();
        for line in lines {
            process_line(&mut analysis, line);
        }
        analysis
    }

    #[test]
    fn test_split_timestamp_layout() {
        let analysis = run(&["[2021-03-01] [10:00] [PACMAN] installed foo"]);

        let record = analysis.table.get("foo").unwrap();
        assert_eq!(record.install_date.as_deref(), Some("2021-03-01 10:00"));
        assert_eq!(analysis.counters.lines_from(LogSource::Pacman), 1);
    }

    #[test]
    fn test_merged_timestamp_layout() {
        let analysis = run(&["[2021-03-01T10:00:00+0000] [ALPM] upgraded linux (5.10 -> 5.11)"]);

        let record = analysis.table.get("linux").unwrap();
        assert_eq!(
            record.last_update_date.as_deref(),
            Some("2021-03-01T10:00:00+0000")
        );
        assert_eq!(analysis.counters.lines_from(LogSource::Alpm), 1);
    }

    #[test]
    fn test_short_line_is_ignored() {
        let analysis = run(&["garbage text here"]);

        assert!(analysis.table.is_empty());
        assert_eq!(analysis.counters.installed, 0);
    }

    #[test]
    fn test_merged_layout_needs_five_tokens() {
        // Only four tokens even though the merged layout would be complete
        let analysis = run(&["[2021-03-01T10:00:00+0000] [ALPM] installed linux"]);

        assert!(analysis.table.is_empty());
        assert_eq!(analysis.counters.lines_from(LogSource::Alpm), 0);
    }

    #[test]
    fn test_untagged_line_is_ignored() {
        let analysis = run(&["[2021-03-01] [10:00] [SYSLOG] installed foo"]);

        assert!(analysis.table.is_empty());
        assert_eq!(analysis.counters.installed, 0);
    }

    #[test]
    fn test_unrecognized_action_only_counts_the_line() {
        let analysis = run(&["[2021-03-01T10:00:00+0000] [PACMAN] synchronizing package lists"]);

        assert_eq!(analysis.counters.lines_from(LogSource::Pacman), 1);
        assert!(analysis.table.is_empty());
        assert_eq!(analysis.counters.installed, 0);
        assert_eq!(analysis.counters.newest_package, None);
    }

    #[test]
    fn test_worked_example() {
        let analysis = run(&[
            "[2021-03-01] [10:00] [PACMAN] installed foo",
            "[2021-03-02] [11:00] [PACMAN] upgraded foo",
            "[2021-03-03] [12:00] [PACMAN] removed foo",
        ]);

        let record = analysis.table.get("foo").unwrap();
        assert_eq!(record.upgrade_count, 1);
        assert_eq!(record.removal_date.as_deref(), Some("2021-03-03 12:00"));

        let counters = &analysis.counters;
        assert_eq!(counters.installed, 1);
        assert_eq!(counters.upgraded, 1);
        assert_eq!(counters.removed, 1);
        assert_eq!(counters.currently_installed, 0);
        assert_eq!(counters.oldest_package.as_deref(), Some("foo"));
        assert_eq!(counters.newest_package.as_deref(), Some("foo"));
        assert!(analysis.table.packages_without_upgrades().is_empty());
    }

    #[test]
    fn test_oldest_is_set_once_newest_follows_events() {
        let analysis = run(&[
            "[2021-03-01] [10:00] [PACMAN] installed foo",
            "[2021-03-02] [10:00] [PACMAN] installed bar",
            "[2021-03-03] [10:00] [PACMAN] upgraded foo",
            "[2021-03-04] [10:00] [PACMAN] removed bar",
        ]);

        let counters = &analysis.counters;
        assert_eq!(counters.oldest_package.as_deref(), Some("foo"));
        // Removal does not move the newest marker
        assert_eq!(counters.newest_package.as_deref(), Some("foo"));
    }

    #[test]
    fn test_removal_before_install_goes_negative() {
        let analysis = run(&[
            "[2021-03-01] [10:00] [PACMAN] removed foo",
            "[2021-03-01] [11:00] [PACMAN] removed bar",
        ]);

        assert_eq!(analysis.counters.currently_installed, -2);
        assert_eq!(analysis.counters.removed, 2);
        assert_eq!(analysis.counters.oldest_package, None);
    }

    #[test]
    fn test_reinstall_after_upgrade_resets_count() {
        let analysis = run(&[
            "[2021-03-01] [10:00] [PACMAN] installed foo",
            "[2021-03-02] [10:00] [PACMAN] upgraded foo",
            "[2021-03-03] [10:00] [PACMAN] reinstalled foo",
        ]);

        let record = analysis.table.get("foo").unwrap();
        assert_eq!(record.upgrade_count, 0);
        assert_eq!(record.install_date.as_deref(), Some("2021-03-03 10:00"));
        assert_eq!(analysis.table.packages_without_upgrades(), vec!["foo"]);
        assert_eq!(analysis.counters.installed, 2);
    }

    #[test]
    fn test_upgrade_without_install_creates_record() {
        let analysis = run(&["[2021-03-02] [11:00] [ALPM] upgraded foo"]);

        let record = analysis.table.get("foo").unwrap();
        assert_eq!(record.upgrade_count, 1);
        assert_eq!(record.install_date, None);
        assert_eq!(analysis.counters.upgraded, 1);
        assert_eq!(analysis.counters.newest_package.as_deref(), Some("foo"));
    }

    #[test]
    fn test_source_counts_keyed_by_found_tag() {
        let analysis = run(&[
            "[2021-03-01] [10:00] [PACMAN] installed foo",
            "[2021-03-01] [10:00] [ALPM-SCRIPTLET] ran post-install hook",
            "[2021-03-01T10:00:00+0000] [ALPM] upgraded foo (1.0 -> 1.1)",
        ]);

        let counters = &analysis.counters;
        assert_eq!(counters.lines_from(LogSource::Pacman), 1);
        assert_eq!(counters.lines_from(LogSource::AlpmScriptlet), 1);
        assert_eq!(counters.lines_from(LogSource::Alpm), 1);
    }

    #[test]
    fn test_missing_input_file() {
        let err = analyze(Path::new("/nonexistent/pacman.log")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Input { .. }));
    }
}
