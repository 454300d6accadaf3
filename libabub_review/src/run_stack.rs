use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::error::RunStackError;

/// The run identifier is the tail of the reconstructed file's stem, in the
/// acquisition's date+index format (e.g. `20200921_2`).
const RUN_ID_LEN: usize = 10;

/// One reconstructed-data file awaiting review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFile {
    pub run_id: String,
    pub path: PathBuf,
}

/// The collection of reconstructed-data files found for a session.
///
/// Runs are enumerated once at session start and consumed front to back in
/// sorted order, so a session always visits runs deterministically no matter
/// what order the directory listing returns.
#[derive(Debug)]
pub struct RunStack {
    file_stack: VecDeque<RunFile>,
}

impl RunStack {
    /// Enumerate the recon directory and build the stack.
    pub fn new(recon_path: &Path) -> Result<Self, RunStackError> {
        let mut file_list: Vec<RunFile> = Vec::new();
        for item in recon_path.read_dir()? {
            let item_path = item?.path();
            if !item_path.is_file() {
                continue;
            }
            if let Some(run_id) = run_id_from_path(&item_path) {
                file_list.push(RunFile {
                    run_id,
                    path: item_path,
                });
            }
        }

        if file_list.is_empty() {
            return Err(RunStackError::NoMatchingFiles);
        }

        file_list.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(Self {
            file_stack: file_list.into(),
        })
    }

    /// A stack with no runs, for sessions that have nothing left to review.
    pub fn empty() -> Self {
        Self {
            file_stack: VecDeque::new(),
        }
    }

    /// Take the next run off the stack. None when the session has seen
    /// every run.
    pub fn pop_next_run(&mut self) -> Option<RunFile> {
        self.file_stack.pop_front()
    }

    pub fn len(&self) -> usize {
        self.file_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_stack.is_empty()
    }
}

/// Derive the run identifier from a reconstructed file name: the last ten
/// characters of the stem. Shorter stems are taken whole.
fn run_id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let n_chars = stem.chars().count();
    if n_chars > RUN_ID_LEN {
        Some(stem.chars().skip(n_chars - RUN_ID_LEN).collect())
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_from_path() {
        assert_eq!(
            run_id_from_path(Path::new("/data/recon/abub_output_20200921_2.txt")),
            Some(String::from("20200921_2"))
        );
        assert_eq!(
            run_id_from_path(Path::new("/data/recon/short.txt")),
            Some(String::from("short"))
        );
    }

    #[test]
    fn test_stack_sorted_and_exhausts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abub_20200922_0.txt"), "").unwrap();
        std::fs::write(dir.path().join("abub_20200921_2.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("not_a_run")).unwrap();

        let mut stack = RunStack::new(dir.path()).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop_next_run().unwrap().run_id, "20200921_2");
        assert_eq!(stack.pop_next_run().unwrap().run_id, "20200922_0");
        assert!(stack.pop_next_run().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RunStack::new(dir.path()),
            Err(RunStackError::NoMatchingFiles)
        ));
    }
}
