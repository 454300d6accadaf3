//! Fixed quantities shared across the review tool.

/// Header row written to a freshly created stats log.
pub const STATS_HEADER: &str = "runname\tev\tcam\tsuccess\ttype";

/// Number of non-data rows at the top of a reconstructed-data file.
pub const RECON_HEADER_ROWS: usize = 6;

/// Radius (pixels, image coordinates) of the marker circle drawn at the
/// reconstructed bubble position.
pub const MARKER_RADIUS: f32 = 50.0;

/// Delay between frames of the flip-book cycle.
pub const FRAME_FLIP_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

/// Caption shown under every displayed frame, listing the valid keys.
pub const KEY_CAPTION: &str =
    "y: bubble  n: no bubble  o: double-count  b: boiling  m: camera moved  c: glitch  q: quit";
