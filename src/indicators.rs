//! Endpoint values, growth multiple and compound annual growth rate per country.
//!
//! "Not applicable" is `None` throughout. A missing data point or undefined
//! arithmetic never aborts the computation for other countries.

use crate::models::{IndicatorResult, Observation};
use ahash::AHashMap;

/// Value of `country` at `year`, if an observation with a value exists.
fn value_at<'a>(
    index: &AHashMap<(&'a str, i32), Option<f64>>,
    country: &'a str,
    year: i32,
) -> Option<f64> {
    index.get(&(country, year)).copied().flatten()
}

/// `last / first`, or `None` for a zero-width range, absent endpoints or a zero start.
pub fn growth_multiple(
    first: Option<f64>,
    last: Option<f64>,
    from_year: i32,
    to_year: i32,
) -> Option<f64> {
    if from_year == to_year {
        return None;
    }
    let (first, last) = (first?, last?);
    if first == 0.0 {
        return None;
    }
    let g = last / first;
    g.is_finite().then_some(g)
}

/// CAGR in percent, rounded to two decimals.
///
/// `None` when the span between the years does not fit an `i32`.
pub fn cagr_pct(
    first: Option<f64>,
    last: Option<f64>,
    from_year: i32,
    to_year: i32,
) -> Option<f64> {
    let ratio = growth_multiple(first, last, from_year, to_year)?;
    let years = f64::from(to_year.checked_sub(from_year)?);
    let rate = ratio.powf(1.0 / years) - 1.0;
    if !rate.is_finite() {
        log::debug!("CAGR undefined for ratio {ratio} over {years} years");
        return None;
    }
    Some(round2(rate * 100.0))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute indicators for `countries` over `[from_year, to_year]`.
///
/// Results follow the order of `countries`.
pub fn compute_indicators(
    observations: &[Observation],
    countries: &[String],
    from_year: i32,
    to_year: i32,
) -> Vec<IndicatorResult> {
    let index: AHashMap<(&str, i32), Option<f64>> = observations
        .iter()
        .filter(|o| o.year == from_year || o.year == to_year)
        .map(|o| ((o.country_code.as_str(), o.year), o.value))
        .collect();

    countries
        .iter()
        .map(|code| {
            let first = value_at(&index, code, from_year);
            let last = value_at(&index, code, to_year);
            let growth = growth_multiple(first, last, from_year, to_year);
            let cagr = cagr_pct(first, last, from_year, to_year);
            if growth.is_none() {
                log::debug!("{code}: growth not applicable for {from_year}..={to_year}");
            }
            IndicatorResult {
                country_code: code.clone(),
                first,
                last,
                growth,
                cagr_pct: cagr,
            }
        })
        .collect()
}
