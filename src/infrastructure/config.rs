//! Application configuration loading.
//!
//! Configuration is read once at startup from an optional TOML file, with
//! environment variables taking precedence, and validated before anything
//! else starts. The vendor access credential is the only required value:
//! its absence is a fatal initialization condition surfaced to the user,
//! never silently ignored.
//!
//! # File format
//!
//! ```text
//! api_key = "vendor-access-credential"
//! endpoint = "https://places.example.com/v1"
//! country = "my"
//! place_types = ["establishment"]
//! debounce_ms = 300
//! surface_id = "map"
//! trace_level = "debug"
//! ```
//!
//! # Environment overrides
//!
//! `PLACEMARK_API_KEY`, `PLACEMARK_ENDPOINT`, `PLACEMARK_COUNTRY` and
//! `PLACEMARK_TRACE_LEVEL` override their file counterparts.

use crate::domain::error::{PlacemarkError, Result};
use crate::maps::SearchRestrictions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

fn default_endpoint() -> String {
    "https://places.example.com/v1".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_surface_id() -> String {
    "map".to_string()
}

fn default_zoom() -> u8 {
    15
}

fn default_surface_attempts() -> u32 {
    10
}

fn default_surface_wait_ms() -> u64 {
    500
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Vendor access credential. Required; validated at startup.
    #[serde(default)]
    pub api_key: String,

    /// Vendor places API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Two-letter country code restricting predictions, if any.
    #[serde(default)]
    pub country: Option<String>,

    /// Vendor place-type filters applied to predictions.
    #[serde(default)]
    pub place_types: Vec<String>,

    /// Debounce window for search submissions, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Identifier of the display surface hosting the map.
    #[serde(default = "default_surface_id")]
    pub surface_id: String,

    /// Zoom level applied when pinning a selection.
    #[serde(default = "default_zoom")]
    pub map_zoom: u8,

    /// Maximum surface readiness attempts before failing terminally.
    #[serde(default = "default_surface_attempts")]
    pub surface_attempts: u32,

    /// Wait per surface readiness attempt, in milliseconds.
    #[serde(default = "default_surface_wait_ms")]
    pub surface_wait_ms: u64,

    /// Tracing filter level, e.g. `"info"` or `"placemark=debug"`.
    #[serde(default)]
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            country: None,
            place_types: Vec::new(),
            debounce_ms: default_debounce_ms(),
            surface_id: default_surface_id(),
            map_zoom: default_zoom(),
            surface_attempts: default_surface_attempts(),
            surface_wait_ms: default_surface_wait_ms(),
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or contains invalid
    /// TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading configuration file");
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| PlacemarkError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Applies environment-variable overrides on top of the current values.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("PLACEMARK_API_KEY") {
            self.api_key = key;
        }
        if let Ok(endpoint) = std::env::var("PLACEMARK_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(country) = std::env::var("PLACEMARK_COUNTRY") {
            self.country = if country.is_empty() {
                None
            } else {
                Some(country)
            };
        }
        if let Ok(level) = std::env::var("PLACEMARK_TRACE_LEVEL") {
            self.trace_level = Some(level);
        }
    }

    /// Loads configuration from an optional file plus environment overrides
    /// and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Config`] when the file is malformed or the
    /// access credential is missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Validates required values.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Config`] when the access credential is
    /// empty.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PlacemarkError::Config(
                "missing vendor access credential (api_key / PLACEMARK_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }

    /// Debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Wait per surface readiness attempt as a [`Duration`].
    #[must_use]
    pub const fn surface_wait(&self) -> Duration {
        Duration::from_millis(self.surface_wait_ms)
    }

    /// Search restrictions derived from the configuration.
    #[must_use]
    pub fn restrictions(&self) -> SearchRestrictions {
        SearchRestrictions {
            country: self.country.clone(),
            place_types: self.place_types.clone(),
        }
    }
}
