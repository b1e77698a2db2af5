//! Pivot (year x country) construction and base-100 rebasing.

use crate::models::{DisplayMode, Observation, PivotTable};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Build a pivot with years ascending as rows and countries as columns.
///
/// Column order is `countries` when given, otherwise first appearance in
/// `observations`. Missing cells are `None`.
pub fn build_pivot(observations: &[Observation], countries: Option<&[String]>) -> PivotTable {
    let years: Vec<i32> = observations
        .iter()
        .map(|o| o.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns: Vec<String> = match countries {
        Some(cs) => cs.to_vec(),
        None => {
            let mut seen = BTreeSet::new();
            observations
                .iter()
                .filter(|o| seen.insert(o.country_code.as_str()))
                .map(|o| o.country_code.clone())
                .collect()
        }
    };

    let row_of: AHashMap<i32, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
    let col_of: AHashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut cells = vec![vec![None; columns.len()]; years.len()];
    for o in observations {
        if let (Some(&r), Some(&c)) = (row_of.get(&o.year), col_of.get(o.country_code.as_str())) {
            cells[r][c] = o.value;
        }
    }

    PivotTable {
        years,
        countries: columns,
        cells,
    }
}

/// A pivot after applying a display mode, plus which columns were indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rebased {
    pub table: PivotTable,
    /// Country columns expressed relative to the base year. Columns not
    /// listed stay in absolute values.
    pub rebased: Vec<String>,
}

/// Apply `mode` to `pivot`.
///
/// `Absolute` returns the table untouched. `Rebased` divides each column by
/// its base-year value and multiplies by 100 when that value is present,
/// finite and non-zero; other columns are left absolute.
pub fn rebase(pivot: &PivotTable, mode: DisplayMode) -> Rebased {
    let DisplayMode::Rebased { base_year } = mode else {
        return Rebased {
            table: pivot.clone(),
            rebased: Vec::new(),
        };
    };

    let mut table = pivot.clone();
    let mut rebased = Vec::new();
    let Some(base_row) = pivot.years.iter().position(|y| *y == base_year) else {
        log::debug!("base year {base_year} not in pivot; leaving all columns absolute");
        return Rebased { table, rebased };
    };

    for (col, country) in pivot.countries.iter().enumerate() {
        match pivot.cells[base_row][col] {
            Some(base) if base != 0.0 && base.is_finite() => {
                for row in table.cells.iter_mut() {
                    if let Some(v) = row[col].as_mut() {
                        *v = *v / base * 100.0;
                    }
                }
                rebased.push(country.clone());
            }
            _ => log::debug!("{country}: no usable value in {base_year}; kept absolute"),
        }
    }
    Rebased { table, rebased }
}
