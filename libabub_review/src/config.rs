use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Structure representing the application configuration. Contains pathing information
/// Configs are serializable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing the raw per-event camera images.
    pub raw_path: PathBuf,
    /// Directory containing the per-run reconstructed-data files.
    pub recon_path: PathBuf,
    /// The cumulative stats log this session appends to.
    pub stats_path: PathBuf,
}

impl Default for Config {
    /// Generate a new Config object. All fields will be empty/invalid
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("None"),
            recon_path: PathBuf::from("None"),
            stats_path: PathBuf::from("abub_stats.txt"),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Get the path to the raw camera image for one frame of a candidate.
    ///
    /// Follows the acquisition layout, e.g.
    /// `<raw_path>/20200912_2/0/Images/cam2_image45.png`
    pub fn get_frame_image_path(
        &self,
        run_id: &str,
        event_id: u32,
        camera_id: u32,
        frame_index: i32,
    ) -> PathBuf {
        self.raw_path
            .join(run_id)
            .join(event_id.to_string())
            .join("Images")
            .join(format!("cam{camera_id}_image{frame_index}.png"))
    }
}
