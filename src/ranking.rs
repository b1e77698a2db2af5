use crate::config::TieBreak;
use crate::meta::{CountryLookup, UNKNOWN_REGION};
use crate::models::{Observation, RankEntry};
use std::cmp::Ordering;

fn by_value_desc(a: &(String, f64), b: &(String, f64), tie: TieBreak) -> Ordering {
    let primary = b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal);
    match tie {
        TieBreak::InputOrder => primary,
        TieBreak::CountryCode => primary.then_with(|| a.0.cmp(&b.0)),
    }
}

fn ranked(mut rows: Vec<(String, f64)>, tie: TieBreak) -> Vec<RankEntry> {
    // sort_by is stable, which gives InputOrder its meaning
    rows.sort_by(|a, b| by_value_desc(a, b, tie));
    rows.into_iter()
        .enumerate()
        .map(|(i, (key, value))| RankEntry {
            rank: i + 1,
            key,
            value,
        })
        .collect()
}

/// Top `top_n` countries by value at `year`, highest first.
///
/// Observations without a value are excluded.
pub fn rank_countries(
    observations: &[Observation],
    year: i32,
    top_n: usize,
    tie: TieBreak,
) -> Vec<RankEntry> {
    let rows: Vec<(String, f64)> = observations
        .iter()
        .filter(|o| o.year == year)
        .filter_map(|o| Some((o.country_code.clone(), o.value?)))
        .filter(|(_, v)| !v.is_nan())
        .collect();
    let mut out = ranked(rows, tie);
    out.truncate(top_n);
    out
}

/// Sum of values at `year` per region, highest first.
///
/// Countries unknown to `lookup` are summed under [`UNKNOWN_REGION`]. Regions
/// appear in input order of their first country before sorting.
pub fn rank_regions<L: CountryLookup + ?Sized>(
    observations: &[Observation],
    year: i32,
    lookup: &L,
    tie: TieBreak,
) -> Vec<RankEntry> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for o in observations.iter().filter(|o| o.year == year) {
        let Some(v) = o.value.filter(|v| !v.is_nan()) else {
            continue;
        };
        let region = lookup.region_of(&o.country_code).unwrap_or(UNKNOWN_REGION);
        match totals.iter_mut().find(|(r, _)| r == region) {
            Some((_, sum)) => *sum += v,
            None => totals.push((region.to_string(), v)),
        }
    }
    ranked(totals, tie)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_follow_configured_order() {
        let obs = vec![
            Observation::new("ZZZ", 2000, Some(5.0)),
            Observation::new("AAA", 2000, Some(5.0)),
        ];
        let input = rank_countries(&obs, 2000, 10, TieBreak::InputOrder);
        assert_eq!(input[0].key, "ZZZ");
        let by_code = rank_countries(&obs, 2000, 10, TieBreak::CountryCode);
        assert_eq!(by_code[0].key, "AAA");
        assert_eq!(by_code[1].rank, 2);
    }
}
