use crate::error::{DashError, Result};
use crate::models::{Observation, Selection};
use ahash::AHashSet;

/// Result of applying a selection. `NoData` is a normal state the caller must
/// present as "no data for current selection", not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Data(Vec<Observation>),
    NoData,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterOutcome::NoData)
    }

    pub fn into_data(self) -> Option<Vec<Observation>> {
        match self {
            FilterOutcome::Data(v) => Some(v),
            FilterOutcome::NoData => None,
        }
    }
}

/// Keep observations whose year lies in `[from_year, to_year]` and whose
/// country is selected. Input order is preserved.
pub fn filter_observations(
    observations: &[Observation],
    sel: &Selection,
) -> Result<FilterOutcome> {
    if sel.from_year > sel.to_year {
        return Err(DashError::InvalidSelection {
            from: sel.from_year,
            to: sel.to_year,
        });
    }
    if sel.countries.is_empty() {
        return Ok(FilterOutcome::NoData);
    }
    let wanted: AHashSet<&str> = sel.countries.iter().map(String::as_str).collect();
    let rows: Vec<Observation> = observations
        .iter()
        .filter(|o| sel.contains_year(o.year) && wanted.contains(o.country_code.as_str()))
        .cloned()
        .collect();
    if rows.is_empty() {
        log::debug!(
            "selection {}..={} with {} countries matched nothing",
            sel.from_year,
            sel.to_year,
            sel.countries.len()
        );
        return Ok(FilterOutcome::NoData);
    }
    Ok(FilterOutcome::Data(rows))
}
