use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fxhash::FxHashSet;

use super::constants::STATS_HEADER;
use super::error::StatsLogError;
use super::labels::EventCategory;

/// Unique identity of one reviewed candidate. Resume matching happens at
/// this granularity, so a session interrupted mid-run picks up at the first
/// candidate without a row in the log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateKey {
    pub run_id: String,
    pub event_id: u32,
    pub camera_id: u32,
}

/// One row of the stats log.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub run_id: String,
    pub event_id: u32,
    pub camera_id: u32,
    pub success: bool,
    pub category: EventCategory,
}

impl LabelRecord {
    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            run_id: self.run_id.clone(),
            event_id: self.event_id,
            camera_id: self.camera_id,
        }
    }

    /// Render the tab-separated row, without the trailing newline.
    ///
    /// `success` keeps the `True`/`False` spelling of the historical logs so
    /// old and new data stay in one file.
    fn to_row(&self) -> String {
        let success = if self.success { "True" } else { "False" };
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.run_id, self.event_id, self.camera_id, success, self.category
        )
    }

    fn from_row(line: &str) -> Option<Self> {
        let entries: Vec<&str> = line.split('\t').collect();
        if entries.len() != 5 {
            return None;
        }
        let success = match entries[3] {
            "True" => true,
            "False" => false,
            _ => return None,
        };
        Some(Self {
            run_id: entries[0].to_string(),
            event_id: entries[1].parse().ok()?,
            camera_id: entries[2].parse().ok()?,
            success,
            category: EventCategory::from_str(entries[4]).ok()?,
        })
    }
}

/// The append-only stats log. Single writer, one growing TSV file.
#[derive(Debug, Clone)]
pub struct StatsLog {
    path: PathBuf,
}

impl StatsLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Create the log with its header row if it does not exist yet.
    /// Idempotent; an existing log is left untouched.
    pub fn ensure_initialized(&self) -> Result<(), StatsLogError> {
        if self.path.exists() {
            return Ok(());
        }
        let mut file = File::create(&self.path)?;
        writeln!(file, "{}", STATS_HEADER)?;
        file.sync_all()?;
        Ok(())
    }

    /// Append one record and sync it to disk before returning.
    ///
    /// The process may be stopped between candidates, and resume correctness
    /// depends on every returned append actually being on disk.
    pub fn append(&self, record: &LabelRecord) -> Result<(), StatsLogError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", record.to_row())?;
        file.sync_all()?;
        Ok(())
    }

    /// Every parseable record currently in the log, in file order.
    ///
    /// A missing log reads as empty rather than an error; that is simply the
    /// "no candidates reviewed yet" state. Rows that fail to parse are
    /// skipped with a warning so one bad line cannot block a session.
    pub fn all_records(&self) -> Result<Vec<LabelRecord>, StatsLogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        let mut lines = contents.lines();
        lines.next(); // Skip the header
        for line in lines {
            if line.is_empty() {
                continue;
            }
            match LabelRecord::from_row(line) {
                Some(record) => records.push(record),
                None => log::warn!("Skipping malformed stats row: {line}"),
            }
        }
        Ok(records)
    }

    /// The set of candidates that already have a row in the log.
    pub fn reviewed_keys(&self) -> Result<FxHashSet<CandidateKey>, StatsLogError> {
        Ok(self
            .all_records()?
            .iter()
            .map(|record| record.key())
            .collect())
    }
}
