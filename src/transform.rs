//! Wide-to-long reshaping of the raw table.
//!
//! The input has one row per country and one column per year. The output is a
//! [`LongTable`] with one [`Observation`] per (country, year column) pair,
//! restricted to the year bounds produced by the configured
//! [`YearBoundsPolicy`].
//!
//! Reshaping is a pure function of the raw table, so [`TransformCache`] can
//! memoize it by content fingerprint across interactive refreshes.

use crate::config::YearBoundsPolicy;
use crate::error::{DashError, Result};
use crate::models::{LongTable, Observation, RawTable, YearBounds};
use ahash::AHashSet;
use regex::Regex;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::{Arc, OnceLock};

fn year_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"))
}

/// Whether a header label is exactly a four-digit year (surrounding blanks ignored).
pub fn is_year_label(label: &str) -> bool {
    year_label_re().is_match(label.trim())
}

/// Header labels that are exactly a four-digit year, parsed and sorted ascending.
pub fn year_columns(headers: &[String]) -> Vec<i32> {
    let mut years: Vec<i32> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| year_label_re().is_match(h))
        .filter_map(|h| h.parse::<i32>().ok())
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Derive the year bounds from the year columns and apply the policy.
///
/// Fails with [`DashError::Configuration`] when there is no year column, or
/// when the policy leaves no year at all.
pub fn year_bounds(years: &[i32], policy: YearBoundsPolicy) -> Result<YearBounds> {
    let (Some(&min), Some(&max)) = (years.first(), years.last()) else {
        return Err(DashError::Configuration(
            "no year columns (four-digit headers) found in input".into(),
        ));
    };
    match policy {
        YearBoundsPolicy::FromData => Ok(YearBounds { min, max }),
        YearBoundsPolicy::ExtendMaxTo(y) => Ok(YearBounds {
            min,
            max: max.max(y),
        }),
        YearBoundsPolicy::DropRecent(n) => {
            let keep = years.len().saturating_sub(n as usize);
            if keep == 0 {
                return Err(DashError::Configuration(format!(
                    "dropping the {n} most recent years leaves no year columns"
                )));
            }
            Ok(YearBounds {
                min,
                max: years[keep - 1],
            })
        }
    }
}

/// Reshape the wide table into a long table.
pub fn wide_to_long(raw: &RawTable, policy: YearBoundsPolicy) -> Result<LongTable> {
    let years = year_columns(&raw.headers);
    let bounds = year_bounds(&years, policy)?;
    let mut in_range: Vec<(i32, String)> = raw
        .headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| year_label_re().is_match(h))
        .filter_map(|h| Some((h.parse::<i32>().ok()?, h.to_string())))
        .filter(|(y, _)| bounds.contains(*y))
        .collect();
    in_range.sort_by_key(|(y, _)| *y);
    in_range.dedup_by_key(|(y, _)| *y);

    let mut seen: AHashSet<&str> = AHashSet::with_capacity(raw.records.len());
    let mut countries = Vec::with_capacity(raw.records.len());
    let mut observations = Vec::with_capacity(raw.records.len() * in_range.len());

    for rec in &raw.records {
        if !seen.insert(rec.country_code.as_str()) {
            return Err(DashError::Configuration(format!(
                "duplicate country code {:?} in input",
                rec.country_code
            )));
        }
        countries.push(rec.country_code.clone());
        for (year, label) in &in_range {
            let value = rec.values.get(label).copied().flatten();
            observations.push(Observation {
                country_code: rec.country_code.clone(),
                country_name: rec.country_name.clone(),
                region: None,
                year: *year,
                value,
            });
        }
    }

    log::debug!(
        "reshaped {} countries x {} years ({}..={})",
        countries.len(),
        in_range.len(),
        bounds.min,
        bounds.max
    );

    Ok(LongTable {
        bounds,
        countries,
        observations,
    })
}

/// Content fingerprint of a raw table. Stable within a process.
pub fn fingerprint(raw: &RawTable) -> u64 {
    let state = ahash::RandomState::with_seeds(0x9e37, 0x79b9, 0x7f4a, 0x7c15);
    let mut h = state.build_hasher();
    raw.headers.hash(&mut h);
    for rec in &raw.records {
        rec.country_code.hash(&mut h);
        rec.country_name.hash(&mut h);
        for (label, value) in &rec.values {
            label.hash(&mut h);
            value.map(f64::to_bits).hash(&mut h);
        }
    }
    h.finish()
}

/// Memoizes [`wide_to_long`] for one raw input at a time.
///
/// A call with a table whose fingerprint or policy differs from the cached
/// entry recomputes and replaces it.
#[derive(Debug, Default)]
pub struct TransformCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: u64,
    policy: YearBoundsPolicy,
    table: Arc<LongTable>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_transform(
        &mut self,
        raw: &RawTable,
        policy: YearBoundsPolicy,
    ) -> Result<Arc<LongTable>> {
        let fp = fingerprint(raw);
        if let Some(e) = &self.entry
            && e.fingerprint == fp
            && e.policy == policy
        {
            log::debug!("transform cache hit ({fp:016x})");
            return Ok(Arc::clone(&e.table));
        }
        let table = Arc::new(wide_to_long(raw, policy)?);
        self.entry = Some(CacheEntry {
            fingerprint: fp,
            policy,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
