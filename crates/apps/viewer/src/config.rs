//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a valid configuration. Environment variables override the file.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use layers::{CountriesConfig, LegendStyle};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "ATLAS_CONFIG";
pub const TSV_URL_ENV: &str = "ATLAS_TSV_URL";
pub const TOPOLOGY_URL_ENV: &str = "ATLAS_TOPOLOGY_URL";
pub const OUT_ENV: &str = "ATLAS_OUT";

pub const DEFAULT_TSV_URL: &str = "https://unpkg.com/world-atlas@1.1.4/world/50m.tsv";
pub const DEFAULT_TOPOLOGY_URL: &str = "https://unpkg.com/world-atlas@1.1.4/world/50m.json";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSettings {
    pub circle_radius: f64,
    pub spacing: f64,
    pub text_offset: f64,
    /// Position of the legend group in the SVG viewport.
    pub offset: [f64; 2],
}

impl Default for LegendSettings {
    fn default() -> Self {
        let style = LegendStyle::default();
        Self {
            circle_radius: style.circle_radius,
            spacing: style.spacing,
            text_offset: style.text_offset,
            offset: [40.0, 275.0],
        }
    }
}

impl LegendSettings {
    pub fn style(&self) -> LegendStyle {
        LegendStyle {
            circle_radius: self.circle_radius,
            spacing: self.spacing,
            text_offset: self.text_offset,
            ..LegendStyle::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// File path or http(s) URL of the attribute table.
    pub tsv_url: String,
    /// File path or http(s) URL of the TopoJSON topology.
    pub topology_url: String,
    pub object_name: String,
    /// Attribute column matched against feature ids.
    pub join_key: String,
    pub category_field: String,
    pub name_field: String,
    pub width: f64,
    pub height: f64,
    /// Refit the projection so every feature fills the viewport.
    pub fit_to_viewport: bool,
    pub legend: LegendSettings,
    pub out: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tsv_url: DEFAULT_TSV_URL.to_string(),
            topology_url: DEFAULT_TOPOLOGY_URL.to_string(),
            object_name: "countries".to_string(),
            join_key: "iso_n3".to_string(),
            category_field: "economy".to_string(),
            name_field: "name".to_string(),
            width: 960.0,
            height: 500.0,
            fit_to_viewport: false,
            legend: LegendSettings::default(),
            out: PathBuf::from("choropleth.svg"),
        }
    }
}

impl ViewerConfig {
    /// Reads the file named by `ATLAS_CONFIG`, if any, then applies the
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_overrides(|key| env::var(key).ok()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&payload).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(TSV_URL_ENV) {
            self.tsv_url = url;
        }
        if let Some(url) = lookup(TOPOLOGY_URL_ENV) {
            self.topology_url = url;
        }
        if let Some(out) = lookup(OUT_ENV) {
            self.out = PathBuf::from(out);
        }
        self
    }

    pub fn countries(&self) -> CountriesConfig {
        CountriesConfig {
            category_field: self.category_field.clone(),
            name_field: self.name_field.clone(),
        }
    }
}
