//! # Configuration Module
//!
//! Holds the settings every run is driven by: where the directory listing
//! lives, which images qualify, where downloads go and which desktop backend
//! applies them.
//!
//! ## Configuration Storage
//! Overrides are read from JSON at:
//! `~/.config/noaa-fulldisk-wallpaper/config.json`
//!
//! Every field is optional in the file; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// GOES-East full-disk GeoColor directory listing.
pub const DEFAULT_PAGE_URL: &str = "https://cdn.star.nesdis.noaa.gov/GOES16/ABI/FD/GEOCOLOR/";

/// Filename ending of the highest resolution rendition in the listing.
pub const DEFAULT_IMAGE_SUFFIX: &str = "21696x21696.jpg";

pub const DEFAULT_FILE_PREFIX: &str = "NOAA_FullDisk";

/// Which desktop backend applies the wallpaper.
///
/// `Auto` picks macOS on Apple targets and otherwise inspects
/// `XDG_CURRENT_DESKTOP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Desktop {
    #[default]
    Auto,
    Macos,
    Cosmic,
    Gnome,
    Kde,
}

/// Settings for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory listing page scraped for image links.
    /// The qualifying href is appended to this string verbatim.
    pub page_url: String,
    /// Only hrefs ending with this suffix are considered.
    pub image_suffix: String,
    /// Folder that receives downloads and is purged after a successful apply.
    /// Defaults to `~/scripts/FullDisk`
    pub destination_dir: PathBuf,
    /// Leading part of generated filenames (`<prefix>_YYYYMMDD_HHMMSS.jpg`).
    pub file_prefix: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub desktop: Desktop,
}

impl Default for Config {
    fn default() -> Self {
        let destination_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scripts")
            .join("FullDisk");

        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            image_suffix: DEFAULT_IMAGE_SUFFIX.to_string(),
            destination_dir,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            request_timeout_secs: None,
            desktop: Desktop::Auto,
        }
    }
}

impl Config {
    /// Returns the path to the configuration file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("noaa-fulldisk-wallpaper").join("config.json"))
    }

    /// Loads the configuration from the default location.
    ///
    /// A missing file gives the defaults. A file that cannot be read or
    /// parsed is reported and the defaults are used, so a broken config
    /// never stops a scheduled run.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }

    /// Reads a configuration file.
    ///
    /// # Returns
    /// * `Ok(None)` - The file does not exist
    /// * `Ok(Some(config))` - Parsed config, defaults filled in
    /// * `Err(_)` - Read or parse failure
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io("read", path)(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::Config { path: path.to_path_buf(), source })
    }

    /// Persists the configuration as pretty-printed JSON.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::io("create", parent))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|source| Error::Config { path: path.to_path_buf(), source })?;

        std::fs::write(path, content).map_err(Error::io("write", path))
    }
}
