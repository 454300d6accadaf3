use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum StatsLogError {
    #[error("StatsLog failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RunStackError {
    #[error("RunStack failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("RunStack did not find any reconstructed-data files in the recon directory")]
    NoMatchingFiles,
}

#[derive(Debug, Error)]
pub enum ReconFileError {
    #[error("Could not open reconstructed-data file because {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Reconstructed-data file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Reconstructed-data file failed to parse a number: {0}")]
    ParsingError(#[from] std::num::ParseFloatError),
    #[error("Reconstructed-data file has the incorrect format; most likely the number of rows or columns is incorrect")]
    BadFileFormat,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot summarize an empty stats log; no candidates have been reviewed yet")]
    EmptyLog,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session failed due to StatsLog error: {0}")]
    LogError(#[from] StatsLogError),
    #[error("Session failed due to RunStack error: {0}")]
    RunError(#[from] RunStackError),
    #[error("Session failed due to configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Session failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}
