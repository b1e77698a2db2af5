//! Dashboard settings: defaults, optionally overridden by a JSON file and then
//! by command-line flags.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of entries shown in a country ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// How the selectable year range is derived from the year columns found in
/// the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum YearBoundsPolicy {
    /// min/max of the year columns present.
    #[default]
    FromData,
    /// Widen the maximum up to the given year. No observations are invented
    /// for years without a column.
    ExtendMaxTo(i32),
    /// Exclude the `n` most recent year columns.
    DropRecent(u32),
}

/// Ordering of ranking entries with equal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order in which entries appear in the input.
    #[default]
    InputOrder,
    /// Ascending by country code (or region label).
    CountryCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub top_n: usize,
    pub year_bounds: YearBoundsPolicy,
    pub tie_break: TieBreak,
    pub default_countries: Vec<String>,
    /// Replaces the embedded country metadata table when set.
    pub metadata_path: Option<PathBuf>,
    /// Locale tag for number formatting, e.g. "en" or "de".
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            year_bounds: YearBoundsPolicy::FromData,
            tie_break: TieBreak::InputOrder,
            default_countries: ["DEU", "FRA", "GBR", "BRA", "MEX", "JPN"]
                .into_iter()
                .map(String::from)
                .collect(),
            metadata_path: None,
            locale: "en".into(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let txt = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&txt)?)
    }
}
