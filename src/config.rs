//! Dashboard configuration.
//!
//! Every policy constant of the dashboard (default selection, ranking
//! cut-offs, label length, bloc membership, map aliases) lives here and can be
//! overridden from a TOML file. Missing sections and fields fall back to the
//! built-in defaults, so an empty file is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub bloc: BlocConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub table: TableConfig,
}

impl DashboardConfig {
    /// Load from a TOML file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Initial (and "reset") filter selection.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_entities")]
    pub default_entities: Vec<String>,

    #[serde(default = "default_year_from")]
    pub year_from: i32,

    #[serde(default = "default_year_to")]
    pub year_to: i32,
}

fn default_entities() -> Vec<String> {
    ["Afghanistan", "Albania", "Algeria"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_year_from() -> i32 {
    1940
}

fn default_year_to() -> i32 {
    2024
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_entities: default_entities(),
            year_from: default_year_from(),
            year_to: default_year_to(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// Longest label shown on a bar axis before it is cut with `...`.
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,

    /// Bars in the filtered comparison chart.
    #[serde(default = "default_comparison_top_n")]
    pub comparison_top_n: usize,

    /// Bars in the historical top-countries chart.
    #[serde(default = "default_historical_top_n")]
    pub historical_top_n: usize,

    /// Aggregate regions left out of the historical ranking.
    #[serde(default = "default_excluded_regions")]
    pub excluded_regions: Vec<String>,

    /// Substrings marking source-specific aggregates, e.g. `(GCP)`.
    #[serde(default = "default_source_markers")]
    pub source_markers: Vec<String>,
}

fn default_label_max_chars() -> usize {
    15
}

fn default_comparison_top_n() -> usize {
    10
}

fn default_historical_top_n() -> usize {
    20
}

fn default_excluded_regions() -> Vec<String> {
    [
        "World",
        "Africa",
        "Asia",
        "Europe",
        "North America",
        "South America",
        "Oceania",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_source_markers() -> Vec<String> {
    vec!["(GCP)".to_string()]
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            label_max_chars: default_label_max_chars(),
            comparison_top_n: default_comparison_top_n(),
            historical_top_n: default_historical_top_n(),
            excluded_regions: default_excluded_regions(),
            source_markers: default_source_markers(),
        }
    }
}

// ---------------------------------------------------------------------------
// Regional bloc
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BlocConfig {
    #[serde(default = "default_bloc_name")]
    pub name: String,

    #[serde(default = "default_bloc_members")]
    pub members: Vec<String>,
}

fn default_bloc_name() -> String {
    "OECD".to_string()
}

fn default_bloc_members() -> Vec<String> {
    [
        "Australia",
        "Austria",
        "Belgium",
        "Canada",
        "Chile",
        "Colombia",
        "Costa Rica",
        "Czech Republic",
        "Denmark",
        "Estonia",
        "Finland",
        "France",
        "Germany",
        "Greece",
        "Hungary",
        "Iceland",
        "Ireland",
        "Israel",
        "Italy",
        "Japan",
        "South Korea",
        "Latvia",
        "Lithuania",
        "Luxembourg",
        "Mexico",
        "Netherlands",
        "New Zealand",
        "Norway",
        "Poland",
        "Portugal",
        "Slovakia",
        "Slovenia",
        "Spain",
        "Sweden",
        "Switzerland",
        "Turkey",
        "United Kingdom",
        "United States",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for BlocConfig {
    fn default() -> Self {
        Self {
            name: default_bloc_name(),
            members: default_bloc_members(),
        }
    }
}

// ---------------------------------------------------------------------------
// World map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_year")]
    pub default_year: i32,

    /// Geography feature name → dataset entity name.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

fn default_map_year() -> i32 {
    2020
}

fn default_aliases() -> BTreeMap<String, String> {
    [
        ("United States of America", "United States"),
        ("Dem. Rep. Congo", "Democratic Republic of Congo"),
        ("Central African Rep.", "Central African Republic"),
        ("Bosnia and Herz.", "Bosnia and Herzegovina"),
        ("Dominican Rep.", "Dominican Republic"),
        ("S. Sudan", "South Sudan"),
        ("Eq. Guinea", "Equatorial Guinea"),
        ("Solomon Is.", "Solomon Islands"),
        ("Falkland Is.", "Falkland Islands"),
        ("W. Sahara", "Western Sahara"),
        ("eSwatini", "Eswatini"),
        ("Côte d'Ivoire", "Cote d'Ivoire"),
        ("Timor-Leste", "East Timor"),
        ("Macedonia", "North Macedonia"),
        ("Czech Rep.", "Czechia"),
    ]
    .into_iter()
    .map(|(geo, data)| (geo.to_string(), data.to_string()))
    .collect()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_year: default_map_year(),
            aliases: default_aliases(),
        }
    }
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_sizes() -> Vec<usize> {
    vec![5, 10, 20, 50]
}

fn default_page_size() -> usize {
    10
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_sizes: default_page_sizes(),
            default_page_size: default_page_size(),
        }
    }
}
