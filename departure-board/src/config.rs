//! Typed board configuration.
//!
//! The core works on already-deserialized, typed records; this module defines
//! them and the cheap structural checks done once at load time. Anything that
//! fails here is fatal at startup; nothing in the refresh cycles ever touches
//! raw configuration again.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::colors::ColorPair;
use crate::domain::StopPoint;

/// Published line-color reference table, maintained by the Träwelling project.
const DEFAULT_COLOR_TABLE_URL: &str =
    "https://raw.githubusercontent.com/Traewelling/line-colors/refs/heads/main/line-colors.csv";

/// Requestor references handed out for the feed are 12 characters. Other
/// lengths are suspicious but not necessarily wrong, so they only warn.
const EXPECTED_REQUESTOR_REF_LEN: usize = 12;

/// Errors raised while loading or validating the configuration.
///
/// All of these are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

/// Feed endpoint credentials: URL plus the opaque requestor reference the
/// operator hands out. The reference is passed through verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedCredentials {
    pub url: String,
    pub requestor_ref: String,
}

/// One configured station: a display name and its physical stop points.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub stop_points: Vec<StopPoint>,
}

/// One display surface, assigned to a station by name. Several displays may
/// show the same station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Display {
    pub station: String,
}

/// Where the color reference table is fetched from and cached to.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorTableConfig {
    #[serde(default = "default_color_table_url")]
    pub url: String,
    #[serde(default = "default_color_table_path")]
    pub path: PathBuf,
}

impl Default for ColorTableConfig {
    fn default() -> Self {
        Self {
            url: default_color_table_url(),
            path: default_color_table_path(),
        }
    }
}

fn default_color_table_url() -> String {
    DEFAULT_COLOR_TABLE_URL.to_string()
}

fn default_color_table_path() -> PathBuf {
    PathBuf::from("line-colors.csv")
}

/// Refresh cadences, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalsConfig {
    /// Departure refresh cycle.
    #[serde(default = "default_departure_refresh_secs")]
    pub departure_refresh_secs: u64,
    /// Color reference table refresh cycle. Daily by default; the table
    /// changes rarely.
    #[serde(default = "default_color_refresh_secs")]
    pub color_refresh_secs: u64,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            departure_refresh_secs: default_departure_refresh_secs(),
            color_refresh_secs: default_color_refresh_secs(),
        }
    }
}

fn default_departure_refresh_secs() -> u64 {
    30
}

fn default_color_refresh_secs() -> u64 {
    24 * 60 * 60
}

/// The whole board configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub credentials: FeedCredentials,
    pub stations: Vec<StationConfig>,
    pub displays: Vec<Display>,
    /// Operator filter for the color table lookup.
    pub operator: String,
    /// Icon colors for lines the reference table does not know.
    pub fallback_colors: ColorPair,
    /// Replacement services inherit the replaced line's colors.
    #[serde(default)]
    pub treat_sev_as_normal: bool,
    #[serde(default)]
    pub color_table: ColorTableConfig,
    #[serde(default)]
    pub intervals: IntervalsConfig,
}

impl BoardConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: BoardConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation.
    ///
    /// Checks the invariants the rest of the crate relies on: non-empty
    /// station list, unique station names, non-empty stop-point lists,
    /// displays referencing existing stations, hex-shaped fallback colors.
    /// An unusual requestor-ref length only warns; the string is opaque.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stations.is_empty() {
            return Err(ConfigError::invalid("no stations configured"));
        }

        let mut names = std::collections::HashSet::new();
        for station in &self.stations {
            if !names.insert(station.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate station name {:?}",
                    station.name
                )));
            }
            if station.stop_points.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "station {:?} has no stop points",
                    station.name
                )));
            }
        }

        for display in &self.displays {
            if !names.contains(display.station.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "display references unknown station {:?}",
                    display.station
                )));
            }
        }

        for (label, color) in [
            ("fallback background", &self.fallback_colors.background),
            ("fallback text", &self.fallback_colors.text),
        ] {
            if !is_hex_color(color) {
                return Err(ConfigError::invalid(format!(
                    "{label} color {color:?} is not a hex color"
                )));
            }
        }

        if self.credentials.requestor_ref.len() != EXPECTED_REQUESTOR_REF_LEN {
            warn!(
                len = self.credentials.requestor_ref.len(),
                "requestor_ref has an unusual length, is it correct?"
            );
        }

        Ok(())
    }
}

/// `#RGB` or `#RRGGBB`.
fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}
