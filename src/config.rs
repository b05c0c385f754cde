//! Settings file: which categories to clean, how often, and what access the
//! permission flow has recorded.
//!
//! ```toml
//! interval_hours = 24
//!
//! [categories]
//! thumbnails = true
//! app_media_caches = false
//!
//! [access]
//! platform_version = 34
//! elevated_access = false
//! data_tree = "primary:Android/data"
//!
//! [paths]
//! storage_root = "/storage/emulated/0"
//! ```

use crate::access::AccessGrants;
use crate::category::CleaningConfiguration;
use crate::error::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_DIR: &str = "reclaim-rs";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const LOG_FILE: &str = "cleaner_log.csv";

/// How often the external scheduler should trigger a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum RunInterval {
    SixHours,
    TwelveHours,
    #[default]
    Daily,
    ThreeDays,
    Weekly,
}

impl RunInterval {
    pub const ALL: [RunInterval; 5] = [
        RunInterval::SixHours,
        RunInterval::TwelveHours,
        RunInterval::Daily,
        RunInterval::ThreeDays,
        RunInterval::Weekly,
    ];

    /// Unknown values fall back to weekly.
    pub fn from_hours(hours: u64) -> Self {
        match hours {
            6 => RunInterval::SixHours,
            12 => RunInterval::TwelveHours,
            24 => RunInterval::Daily,
            72 => RunInterval::ThreeDays,
            _ => RunInterval::Weekly,
        }
    }

    pub fn hours(&self) -> u64 {
        match self {
            RunInterval::SixHours => 6,
            RunInterval::TwelveHours => 12,
            RunInterval::Daily => 24,
            RunInterval::ThreeDays => 72,
            RunInterval::Weekly => 168,
        }
    }
}

impl From<u64> for RunInterval {
    fn from(hours: u64) -> Self {
        Self::from_hours(hours)
    }
}

impl From<RunInterval> for u64 {
    fn from(interval: RunInterval) -> Self {
        interval.hours()
    }
}

/// Locations overriding the platform defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub storage_root: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "interval_hours")]
    pub interval: RunInterval,
    pub categories: CleaningConfiguration,
    pub access: AccessGrants,
    pub paths: PathSettings,
}

impl Settings {
    /// Default location: `<config dir>/reclaim-rs/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content).map_err(|source| CleanError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn storage_root(&self) -> Result<PathBuf> {
        self.paths
            .storage_root
            .clone()
            .or_else(dirs::home_dir)
            .ok_or_else(|| unsupported("cannot determine the storage root"))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        self.paths
            .cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR)))
            .ok_or_else(|| unsupported("cannot determine the cache directory"))
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        self.paths
            .log_file
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE)))
            .ok_or_else(|| unsupported("cannot determine the log location"))
    }
}

fn unsupported(what: &str) -> CleanError {
    CleanError::NotSupported(what.to_string())
}
