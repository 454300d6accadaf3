use std::collections::VecDeque;
use std::path::PathBuf;

use fxhash::FxHashSet;

use super::config::Config;
use super::error::{RunStackError, SessionError};
use super::labels::{EventCategory, ReviewKey};
use super::recon_file::{self, Candidate};
use super::run_stack::RunStack;
use super::stats_log::{CandidateKey, LabelRecord, StatsLog};

/// The repeating 7-offset window the viewer cycles through around the
/// trigger frame, giving a flip-book effect: 0, 1, 2, 3, -3, -2, -1, 0, ...
#[derive(Debug, Clone, Default)]
pub struct FrameCycle {
    offset: i32,
}

impl FrameCycle {
    const MAX_OFFSET: i32 = 3;
    const MIN_OFFSET: i32 = -3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset from the trigger frame.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Step to the next frame of the cycle.
    pub fn advance(&mut self) {
        self.offset += 1;
        if self.offset > Self::MAX_OFFSET {
            self.offset = Self::MIN_OFFSET;
        }
    }
}

/// Everything the display layer needs to draw the current review frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub run_id: String,
    pub event_id: u32,
    pub camera_id: u32,
    pub frame_index: i32,
    pub image_path: PathBuf,
    /// Reconstructed bubble position, in image coordinates.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug)]
struct ActiveReview {
    candidate: Candidate,
    cycle: FrameCycle,
}

/// One sitting of the review tool.
///
/// The session walks runs and candidates sequentially and is driven from the
/// outside: a timer calls [`ReviewSession::advance_frame`] to animate the
/// flip-book, key events arrive through [`ReviewSession::handle_key`], and
/// the display layer pulls [`ReviewSession::current_view`] each redraw.
/// Candidates already present in the stats log are skipped, so a stopped
/// session resumes where it left off. Sentinel candidates (no reconstructed
/// position) are labeled automatically and never shown.
#[derive(Debug)]
pub struct ReviewSession {
    config: Config,
    log: StatsLog,
    reviewed: FxHashSet<CandidateKey>,
    runs: RunStack,
    pending: VecDeque<Candidate>,
    active: Option<ActiveReview>,
    finished: bool,
    quit: bool,
}

impl ReviewSession {
    /// Open the stats log and enumerate the unreviewed work, advancing to
    /// the first candidate that needs the operator.
    ///
    /// A log that cannot be initialized is fatal; an empty recon directory
    /// just produces a session that is already finished.
    pub fn begin(config: Config) -> Result<Self, SessionError> {
        let log = StatsLog::new(&config.stats_path);
        log.ensure_initialized()?;
        let reviewed = log.reviewed_keys()?;

        let runs = match RunStack::new(&config.recon_path) {
            Ok(stack) => stack,
            Err(RunStackError::NoMatchingFiles) => {
                log::warn!(
                    "No reconstructed-data files in {}; nothing to review",
                    config.recon_path.display()
                );
                RunStack::empty()
            }
            Err(e) => return Err(SessionError::RunError(e)),
        };

        let mut session = Self {
            config,
            log,
            reviewed,
            runs,
            pending: VecDeque::new(),
            active: None,
            finished: false,
            quit: false,
        };
        session.advance()?;
        Ok(session)
    }

    /// Move forward until a candidate needs operator input or the work is
    /// exhausted. Sentinel candidates are written through as
    /// `(False, cantfind)` along the way; runs that fail to parse are
    /// reported and skipped.
    fn advance(&mut self) -> Result<(), SessionError> {
        while self.active.is_none() && !self.finished {
            if let Some(candidate) = self.pending.pop_front() {
                if candidate.has_detection() {
                    self.active = Some(ActiveReview {
                        candidate,
                        cycle: FrameCycle::new(),
                    });
                } else {
                    // The reconstruction never found a bubble; nothing to show
                    self.log.append(&LabelRecord {
                        run_id: candidate.run_id,
                        event_id: candidate.event_id,
                        camera_id: candidate.camera_id,
                        success: false,
                        category: EventCategory::CantFind,
                    })?;
                }
            } else if let Some(run) = self.runs.pop_next_run() {
                match recon_file::extract(&run.run_id, &run.path) {
                    Ok(candidates) => {
                        self.pending = candidates
                            .into_iter()
                            .filter(|candidate| !self.reviewed.contains(&candidate.key()))
                            .collect();
                        log::info!(
                            "Run {}: {} candidates awaiting review",
                            run.run_id,
                            self.pending.len()
                        );
                    }
                    Err(e) => {
                        log::error!("Skipping run {}: {e}", run.run_id);
                    }
                }
            } else {
                self.finished = true;
            }
        }
        Ok(())
    }

    /// Feed one keystroke into the session. Unmapped keys are ignored.
    ///
    /// A label key writes exactly one record for the candidate on screen and
    /// moves on; `q` ends the whole session without writing anything for the
    /// in-progress candidate.
    pub fn handle_key(&mut self, key: char) -> Result<(), SessionError> {
        if self.finished {
            return Ok(());
        }
        let Some(action) = ReviewKey::from_char(key) else {
            return Ok(());
        };
        match action.label() {
            None => {
                log::info!("Quit requested; ending review session");
                self.active = None;
                self.pending.clear();
                self.finished = true;
                self.quit = true;
            }
            Some((success, category)) => {
                if let Some(active) = self.active.take() {
                    self.log.append(&LabelRecord {
                        run_id: active.candidate.run_id,
                        event_id: active.candidate.event_id,
                        camera_id: active.candidate.camera_id,
                        success,
                        category,
                    })?;
                    self.advance()?;
                }
            }
        }
        Ok(())
    }

    /// Step the flip-book to its next frame. Called on the animation timer;
    /// a no-op when nothing is awaiting input.
    pub fn advance_frame(&mut self) {
        if let Some(active) = &mut self.active {
            active.cycle.advance();
        }
    }

    /// What should be on screen right now, or None when the session is done.
    pub fn current_view(&self) -> Option<FrameView> {
        let active = self.active.as_ref()?;
        let candidate = &active.candidate;
        let frame_index = candidate.trigger_frame + active.cycle.offset();
        Some(FrameView {
            run_id: candidate.run_id.clone(),
            event_id: candidate.event_id,
            camera_id: candidate.camera_id,
            frame_index,
            image_path: self.config.get_frame_image_path(
                &candidate.run_id,
                candidate.event_id,
                candidate.camera_id,
                frame_index,
            ),
            x: candidate.x,
            y: candidate.y,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the session ended through the quit key rather than running
    /// out of candidates.
    pub fn was_quit(&self) -> bool {
        self.quit
    }

    /// The log this session writes through, for end-of-session aggregation.
    pub fn stats_log(&self) -> &StatsLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const HEADER: &str = "run 20200921_2\ntemp 16.1\npressure 30.2\nlivetime 3580.2\nncams 4\nid ev pmt trig cam frame0 horiz vert extra\n";

    fn fixture_config(root: &Path) -> Config {
        let config = Config {
            raw_path: root.join("raw"),
            recon_path: root.join("recon"),
            stats_path: root.join("abub_stats.txt"),
        };
        std::fs::create_dir_all(&config.recon_path).unwrap();
        config
    }

    fn write_run(config: &Config, run_id: &str, body: &str) {
        std::fs::write(
            config.recon_path.join(format!("abub_{run_id}.txt")),
            format!("{HEADER}{body}"),
        )
        .unwrap();
    }

    #[test]
    fn test_frame_cycle_sequence() {
        let mut cycle = FrameCycle::new();
        let mut offsets = vec![cycle.offset()];
        for _ in 0..14 {
            cycle.advance();
            offsets.push(cycle.offset());
        }
        assert_eq!(
            offsets,
            vec![0, 1, 2, 3, -3, -2, -1, 0, 1, 2, 3, -3, -2, -1, 0]
        );
    }

    #[test]
    fn test_sentinel_candidates_auto_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(
            &config,
            "20200921_2",
            "0 0 1 0 2 45 0 0 0\n0 0 1 0 3 45 0 0 0\n",
        );

        let session = ReviewSession::begin(config).unwrap();
        assert!(session.is_finished());
        assert!(!session.was_quit());
        assert!(session.current_view().is_none());

        let records = session.stats_log().all_records().unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(!record.success);
            assert_eq!(record.category, EventCategory::CantFind);
        }
    }

    #[test]
    fn test_label_written_once_and_session_ends() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(&config, "20200921_2", "0 7 1 0 2 45 211.0 391.5 0\n");

        let mut session = ReviewSession::begin(config).unwrap();
        let view = session.current_view().unwrap();
        assert_eq!(view.run_id, "20200921_2");
        assert_eq!(view.event_id, 7);
        assert_eq!(view.camera_id, 2);
        assert_eq!(view.frame_index, 45);
        assert!(view
            .image_path
            .ends_with("20200921_2/7/Images/cam2_image45.png"));

        // Unmapped keys leave the candidate on screen with nothing written
        session.handle_key('x').unwrap();
        assert!(session.current_view().is_some());
        assert!(session.stats_log().all_records().unwrap().is_empty());

        session.handle_key('y').unwrap();
        assert!(session.is_finished());
        let records = session.stats_log().all_records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].category, EventCategory::NA);
        assert_eq!(records[0].event_id, 7);
    }

    #[test]
    fn test_frame_advances_with_timer() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(&config, "20200921_2", "0 0 1 0 2 45 211.0 391.5 0\n");

        let mut session = ReviewSession::begin(config).unwrap();
        let mut frames = Vec::new();
        for _ in 0..8 {
            frames.push(session.current_view().unwrap().frame_index);
            session.advance_frame();
        }
        assert_eq!(frames, vec![45, 46, 47, 48, 42, 43, 44, 45]);
    }

    #[test]
    fn test_quit_writes_nothing_for_in_progress_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(
            &config,
            "20200921_2",
            "0 0 1 0 2 45 211.0 391.5 0\n1 1 1 0 2 52 98.25 340.0 0\n",
        );

        let mut session = ReviewSession::begin(config).unwrap();
        session.handle_key('q').unwrap();
        assert!(session.is_finished());
        assert!(session.was_quit());
        assert!(session.current_view().is_none());
        assert!(session.stats_log().all_records().unwrap().is_empty());

        // Keys after quit are dead
        session.handle_key('y').unwrap();
        assert!(session.stats_log().all_records().unwrap().is_empty());
    }

    #[test]
    fn test_resume_skips_reviewed_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(
            &config,
            "20200921_2",
            "0 0 1 0 2 45 0 0 0\n1 1 1 0 2 52 98.25 340.0 0\n",
        );

        // First sitting auto-labels the sentinel, then stops before labeling
        let session = ReviewSession::begin(config.clone()).unwrap();
        drop(session);

        // Second sitting resumes at the unreviewed candidate, mid-run
        let mut session = ReviewSession::begin(config.clone()).unwrap();
        assert_eq!(session.stats_log().all_records().unwrap().len(), 1);
        let view = session.current_view().unwrap();
        assert_eq!(view.event_id, 1);
        session.handle_key('n').unwrap();
        assert!(session.is_finished());

        // Third sitting finds everything reviewed and writes no duplicates
        let session = ReviewSession::begin(config).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.stats_log().all_records().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_run_skipped_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        std::fs::write(config.recon_path.join("abub_20200920_1.txt"), "garbage\n").unwrap();
        write_run(&config, "20200921_2", "0 0 1 0 2 45 0 0 0\n");

        let session = ReviewSession::begin(config).unwrap();
        assert!(session.is_finished());
        let records = session.stats_log().all_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].run_id, "20200921_2");
    }

    #[test]
    fn test_empty_recon_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());

        let session = ReviewSession::begin(config).unwrap();
        assert!(session.is_finished());
        assert!(!session.was_quit());
    }

    #[test]
    fn test_special_category_keys() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_run(
            &config,
            "20200921_2",
            "0 0 1 0 2 45 211.0 391.5 0\n1 1 1 0 2 52 98.25 340.0 0\n",
        );

        let mut session = ReviewSession::begin(config).unwrap();
        session.handle_key('b').unwrap();
        session.handle_key('m').unwrap();
        assert!(session.is_finished());

        let records = session.stats_log().all_records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].success);
        assert_eq!(records[0].category, EventCategory::Boiling);
        assert!(records[1].success);
        assert_eq!(records[1].category, EventCategory::Giration);
    }
}
