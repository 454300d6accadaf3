//! # abub_review
//!
//! abub_review is the manual review tool for autobub reconstruction output
//! from PICO-40L, written in Rust. It walks the per-run reconstructed-data
//! files produced by autobub, shows the reviewer the camera frames around
//! each bubble candidate, records a single-keystroke classification for each
//! one into a cumulative stats log, and reports aggregate rates (bubble
//! finding success rate and per-100 counts of the special event categories).
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust
//! before, you will most likely need to install the Rust tool chain. See the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation
//! instructions.
//!
//! To build and install the GUI reviewer use `cargo install --path ./abub_review`
//! from the top level abub_review repository.
//!
//! To build and install the CLI use `cargo install --path ./abub_review_cli`
//! from the top level abub_review repository. The CLI does not review; it
//! prints the aggregate report from an existing stats log and can generate a
//! template configuration file.
//!
//! ## Configuration
//!
//! Both applications share one YAML configuration file:
//!
//! ```yml
//! raw_path: /mnt/d/40l-19-data
//! recon_path: /home/nsand/data
//! stats_path: abub_stats.txt
//! ```
//!
//! - `raw_path`: directory containing the raw per-event camera images, laid
//!   out as `<run>/<event>/Images/cam<cam>_image<frame>.png`
//! - `recon_path`: directory containing one reconstructed-data file per run;
//!   the run name is taken from the tail of each file name (e.g. `20200921_2`)
//! - `stats_path`: the cumulative stats log. Sessions append to it and use it
//!   to skip candidates that were already reviewed, so the same file should
//!   be kept across sittings.
//!
//! Configurations can be saved from the GUI using File->Save and loaded
//! using File->Open; a file saved by the GUI works with the CLI and vice
//! versa.
//!
//! ## Review keys
//!
//! | Key | Meaning |
//! |-----|---------|
//! | y | bubble found (success) |
//! | n | no bubble (false positive) |
//! | o | double-counted bubble |
//! | b | boiling |
//! | m | camera moved |
//! | c | camera glitch |
//! | q | quit the session |
//!
//! Candidates where autobub reported no position at all are recorded as
//! `cantfind` automatically and never shown.
//!
//! ## Output
//!
//! The stats log is a tab-separated text table with a fixed header:
//!
//! ```text
//! runname	ev	cam	success	type
//! 20200921_2	14	2	True	NA
//! ```
//!
//! It is append-only; rows are never rewritten, and every append is synced
//! to disk before the next candidate comes up so an interrupted session
//! loses nothing. The GUI also writes a session log file `abub_review.log`
//! with the status of the run; it can be easily shared when errors occur.
pub mod config;
pub mod constants;
pub mod error;
pub mod labels;
pub mod recon_file;
pub mod report;
pub mod review;
pub mod run_stack;
pub mod stats_log;
