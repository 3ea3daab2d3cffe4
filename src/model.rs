// src/model.rs

use std::collections::HashMap;

/// Subsystem a log line originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Pacman,
    Alpm,
    AlpmScriptlet,
}

impl LogSource {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "[PACMAN]" => Some(LogSource::Pacman),
            "[ALPM]" => Some(LogSource::Alpm),
            "[ALPM-SCRIPTLET]" => Some(LogSource::AlpmScriptlet),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogSource::Pacman => "[PACMAN]",
            LogSource::Alpm => "[ALPM]",
            LogSource::AlpmScriptlet => "[ALPM-SCRIPTLET]",
        }
    }
}

/// Aggregated install/upgrade/removal history for one package.
/// `None` dates render as the "-" sentinel in the report.
#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub name: String,
    pub install_date: Option<String>,
    pub last_update_date: Option<String>,
    pub upgrade_count: u32,
    pub removal_date: Option<String>,
}

impl PackageRecord {
    fn new(name: &str) -> Self {
        PackageRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Maps package names to their aggregate records
#[derive(Debug, Default)]
pub struct PackageTable {
    records: HashMap<String, PackageRecord>,
}

impl PackageTable {
    pub fn new() -> Self {
        PackageTable::default()
    }

    /// A fresh install forgets any earlier history of the package:
    /// upgrade count and removal date are reset along with the install date.
    pub fn record_install(&mut self, name: &str, timestamp: &str) {
        let record = self.entry(name);
        record.install_date = Some(timestamp.to_string());
        record.last_update_date = None;
        record.upgrade_count = 0;
        record.removal_date = None;
    }

    /// An upgrade of a package never seen before starts its count at 1.
    pub fn record_upgrade(&mut self, name: &str, timestamp: &str) {
        let record = self.entry(name);
        record.upgrade_count += 1;
        record.last_update_date = Some(timestamp.to_string());
    }

    pub fn record_removal(&mut self, name: &str, timestamp: &str) {
        self.entry(name).removal_date = Some(timestamp.to_string());
    }

    /// Lookup only; never inserts.
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.records.get(name)
    }

    /// Iteration order is hash-map order; nothing may rely on it.
    pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names with no upgrade since their last install, sorted for stable output
    pub fn packages_without_upgrades(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .records
            .values()
            .filter(|record| record.upgrade_count == 0)
            .map(|record| record.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn entry(&mut self, name: &str) -> &mut PackageRecord {
        self.records
            .entry(name.to_string())
            .or_insert_with(|| PackageRecord::new(name))
    }
}

/// Run-wide totals accumulated alongside the package table
#[derive(Debug, Default)]
pub struct RunCounters {
    pub installed: u64,
    pub upgraded: u64,
    pub removed: u64,
    /// Installs minus removals; a removal of a never-installed package
    /// pushes this negative, no clamping.
    pub currently_installed: i64,
    /// First package ever installed, set once
    pub oldest_package: Option<String>,
    /// Package of the most recent install/reinstall/upgrade event
    pub newest_package: Option<String>,
    pacman_lines: u64,
    alpm_lines: u64,
    alpm_scriptlet_lines: u64,
}

impl RunCounters {
    pub fn count_line(&mut self, source: LogSource) {
        match source {
            LogSource::Pacman => self.pacman_lines += 1,
            LogSource::Alpm => self.alpm_lines += 1,
            LogSource::AlpmScriptlet => self.alpm_scriptlet_lines += 1,
        }
    }

    pub fn lines_from(&self, source: LogSource) -> u64 {
        match source {
            LogSource::Pacman => self.pacman_lines,
            LogSource::Alpm => self.alpm_lines,
            LogSource::AlpmScriptlet => self.alpm_scriptlet_lines,
        }
    }
}

/// The complete state of one analysis run
#[derive(Debug, Default)]
pub struct Analysis {
    pub table: PackageTable,
    pub counters: RunCounters,
}
