use std::path::Path;

use super::constants::RECON_HEADER_ROWS;
use super::error::ReconFileError;
use super::stats_log::CandidateKey;

// Column indices within a reconstructed-data row. The files carry many more
// quantities than the reviewer needs; these five identify a candidate.
const EVENT_COLUMN: usize = 1;
const CAMERA_COLUMN: usize = 4;
const FRAME_COLUMN: usize = 5;
const X_COLUMN: usize = 6;
const Y_COLUMN: usize = 7;

/// One (event, camera) pair to be visually reviewed.
///
/// `trigger_frame` is the frame index the reconstruction associated with the
/// candidate's onset; the review loop cycles frames around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub run_id: String,
    pub event_id: u32,
    pub camera_id: u32,
    pub trigger_frame: i32,
    pub x: f64,
    pub y: f64,
}

impl Candidate {
    /// Whether the reconstruction actually located a bubble.
    ///
    /// The upstream writer emits x = y = 0 as its "not found" sentinel, which
    /// is indistinguishable from a genuine origin coordinate. That ambiguity
    /// is inherited from the data format; this predicate is the single place
    /// the policy lives.
    pub fn has_detection(&self) -> bool {
        !(self.x == 0.0 && self.y == 0.0)
    }

    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            run_id: self.run_id.clone(),
            event_id: self.event_id,
            camera_id: self.camera_id,
        }
    }
}

/// Parse one run's reconstructed-data file into its ordered candidate list.
///
/// Row order is preserved; candidates with the not-found sentinel are kept
/// as data, not dropped.
pub fn extract(run_id: &str, path: &Path) -> Result<Vec<Candidate>, ReconFileError> {
    if !path.exists() {
        return Err(ReconFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    extract_from_str(run_id, &contents)
}

/// Parsing core, separated from file IO.
///
/// The first six rows are run metadata, not data. Every field parses as a
/// float (the upstream writer emits floats throughout) and the integral
/// columns are narrowed afterwards.
pub fn extract_from_str(run_id: &str, contents: &str) -> Result<Vec<Candidate>, ReconFileError> {
    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() < RECON_HEADER_ROWS {
        return Err(ReconFileError::BadFileFormat);
    }

    let mut candidates = Vec::new();
    for line in &lines[RECON_HEADER_ROWS..] {
        if line.trim().is_empty() {
            continue;
        }
        let entries: Vec<&str> = line.split_whitespace().collect();
        if entries.len() <= Y_COLUMN {
            return Err(ReconFileError::BadFileFormat);
        }

        let event_id = entries[EVENT_COLUMN].parse::<f64>()?;
        let camera_id = entries[CAMERA_COLUMN].parse::<f64>()?;
        let trigger_frame = entries[FRAME_COLUMN].parse::<f64>()?;
        let x = entries[X_COLUMN].parse::<f64>()?;
        let y = entries[Y_COLUMN].parse::<f64>()?;
        if event_id < 0.0 || camera_id < 0.0 {
            return Err(ReconFileError::BadFileFormat);
        }

        candidates.push(Candidate {
            run_id: run_id.to_string(),
            event_id: event_id as u32,
            camera_id: camera_id as u32,
            trigger_frame: trigger_frame as i32,
            x,
            y,
        });
    }

    Ok(candidates)
}
