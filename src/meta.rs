//! Country metadata: display names and region labels keyed by country code.
//!
//! The lookup is an injectable trait so a caller can swap the embedded table
//! for its own. Unknown codes are never an error: enrichment is best-effort.

use crate::error::Result;
use crate::models::Observation;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Label used for observations whose country has no known region.
pub const UNKNOWN_REGION: &str = "Unknown";

static EMBEDDED_META: &str = include_str!("../assets/country_meta.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub code: String,
    pub name: String,
    pub region: String,
}

/// Read-only country metadata lookup.
pub trait CountryLookup {
    fn lookup(&self, code: &str) -> Option<&CountryInfo>;

    fn region_of(&self, code: &str) -> Option<&str> {
        self.lookup(code).map(|c| c.region.as_str())
    }
}

/// On-disk format of a metadata resource.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct MetaFile {
    version: String,
    countries: Vec<CountryInfo>,
}

/// Versioned static country table.
#[derive(Debug, Clone, Default)]
pub struct StaticCountryTable {
    version: String,
    by_code: AHashMap<String, CountryInfo>,
}

impl StaticCountryTable {
    /// The table compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_META)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let txt = fs::read_to_string(path)?;
        Self::from_json_str(&txt)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: MetaFile = serde_json::from_str(s)?;
        let table = Self::from_entries(file.version, file.countries);
        log::info!(
            "loaded country metadata v{} ({} countries)",
            table.version,
            table.len()
        );
        Ok(table)
    }

    /// Later entries with the same code replace earlier ones.
    pub fn from_entries(
        version: impl Into<String>,
        entries: impl IntoIterator<Item = CountryInfo>,
    ) -> Self {
        let by_code = entries
            .into_iter()
            .map(|c| (c.code.to_ascii_uppercase(), c))
            .collect();
        Self {
            version: version.into(),
            by_code,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl CountryLookup for StaticCountryTable {
    fn lookup(&self, code: &str) -> Option<&CountryInfo> {
        self.by_code.get(&code.trim().to_ascii_uppercase())
    }
}

/// Attach display name and region to each observation where known.
///
/// Observations are never dropped. A name already carried from the raw file is
/// kept when the lookup has no entry for the code.
pub fn join_metadata<L: CountryLookup + ?Sized>(observations: &mut [Observation], lookup: &L) {
    let mut unknown = 0usize;
    for obs in observations.iter_mut() {
        match lookup.lookup(&obs.country_code) {
            Some(info) => {
                obs.country_name = Some(info.name.clone());
                obs.region = Some(info.region.clone());
            }
            None => {
                obs.region = None;
                unknown += 1;
            }
        }
    }
    if unknown > 0 {
        log::debug!("{unknown} observations without country metadata");
    }
}
