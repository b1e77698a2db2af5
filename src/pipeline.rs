//! Per-session recomputation: selection in, everything the presentation layer
//! needs out.
//!
//! The raw table and the metadata lookup are shared read-only (`Arc`); each
//! [`Session`] owns its own transform cache and produces fresh results per
//! [`Selection`].

use crate::config::DashboardConfig;
use crate::error::{DashError, Result};
use crate::filter::{FilterOutcome, filter_observations};
use crate::format::choose_scale;
use crate::indicators::compute_indicators;
use crate::meta::{CountryLookup, join_metadata};
use crate::models::{
    IndicatorResult, LongTable, Observation, RankEntry, RawTable, RenderPlan, Selection,
    YearBounds,
};
use crate::pivot::{Rebased, build_pivot, rebase};
use crate::ranking::{rank_countries, rank_regions};
use crate::transform::TransformCache;
use serde::Serialize;
use std::sync::Arc;

/// Shared, read-only metadata lookup.
pub type SharedLookup = Arc<dyn CountryLookup + Send + Sync>;

/// Everything derived from one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub plan: RenderPlan,
    /// Filtered long table (raw data view and export).
    pub observations: Vec<Observation>,
    /// Pivot after applying the plan's display mode.
    pub chart: Rebased,
    pub indicators: Vec<IndicatorResult>,
    /// Year used for the rankings (the selection's end year).
    pub ranking_year: i32,
    pub top_countries: Vec<RankEntry>,
    pub regions: Vec<RankEntry>,
    /// Display scale for absolute values, e.g. `(1e9, "billions")`.
    pub scale: (f64, &'static str),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    /// The selection matched nothing; widgets should render an empty state.
    NoData { selection: Selection },
    Ready(Box<Dashboard>),
}

pub struct Session {
    raw: Arc<RawTable>,
    lookup: SharedLookup,
    config: DashboardConfig,
    cache: TransformCache,
    /// Transformed table with metadata joined, plus the transform output it came from.
    joined: Option<(Arc<LongTable>, Arc<LongTable>)>,
}

impl Session {
    pub fn new(raw: Arc<RawTable>, lookup: SharedLookup, config: DashboardConfig) -> Self {
        Self {
            raw,
            lookup,
            config,
            cache: TransformCache::new(),
            joined: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Swap the raw input and drop everything derived from the old one.
    pub fn replace_input(&mut self, raw: Arc<RawTable>) {
        self.raw = raw;
        self.cache.invalidate();
        self.joined = None;
    }

    /// Long table with metadata attached. Reshaping is memoized.
    pub fn long_table(&mut self) -> Result<Arc<LongTable>> {
        let source = self.cache.get_or_transform(&self.raw, self.config.year_bounds)?;
        if let Some((src, joined)) = &self.joined
            && Arc::ptr_eq(src, &source)
        {
            return Ok(Arc::clone(joined));
        }
        let mut table = (*source).clone();
        join_metadata(&mut table.observations, self.lookup.as_ref());
        let joined = Arc::new(table);
        self.joined = Some((source, Arc::clone(&joined)));
        Ok(joined)
    }

    pub fn year_bounds(&mut self) -> Result<YearBounds> {
        Ok(self.long_table()?.bounds)
    }

    /// Configured default countries present in the data, from the first
    /// selectable year to the last year that has at least one value.
    ///
    /// With `ExtendMaxTo` the selectable max can lie past the data; the
    /// default range still ends on a year with values so the rankings are not
    /// empty. Falls back to the max bound when no value is present at all.
    pub fn default_selection(&mut self) -> Result<Selection> {
        let table = self.long_table()?;
        let countries = self
            .config
            .default_countries
            .iter()
            .filter(|c| table.countries.contains(*c))
            .cloned()
            .collect();
        let to_year = table
            .observations
            .iter()
            .filter(|o| o.value.is_some())
            .map(|o| o.year)
            .max()
            .unwrap_or(table.bounds.max);
        Ok(Selection::new(table.bounds.min, to_year, countries))
    }

    /// Run the full pipeline for one selection.
    pub fn compute(&mut self, sel: &Selection) -> Result<DashboardView> {
        let table = self.long_table()?;
        let rows = match filter_observations(&table.observations, sel)? {
            FilterOutcome::Data(rows) => rows,
            FilterOutcome::NoData => {
                return Ok(DashboardView::NoData {
                    selection: sel.clone(),
                });
            }
        };

        let plan = sel.render_plan();
        let pivot = build_pivot(&rows, Some(sel.countries.as_slice()));
        let chart = rebase(&pivot, plan.display);
        let indicators = compute_indicators(&rows, &sel.countries, sel.from_year, sel.to_year);

        let ranking_year = sel.to_year;
        let top_countries = rank_countries(
            &table.observations,
            ranking_year,
            self.config.top_n,
            self.config.tie_break,
        );
        let regions = rank_regions(
            &table.observations,
            ranking_year,
            self.lookup.as_ref(),
            self.config.tie_break,
        );

        let max_abs = rows
            .iter()
            .filter_map(|o| o.value)
            .fold(0.0_f64, |m, v| m.max(v.abs()));

        Ok(DashboardView::Ready(Box::new(Dashboard {
            plan,
            observations: rows,
            chart,
            indicators,
            ranking_year,
            top_countries,
            regions,
            scale: choose_scale(max_abs),
        })))
    }
}

/// Validate a selection against the table's bounds.
pub fn check_selection(sel: &Selection, bounds: YearBounds) -> Result<()> {
    if sel.from_year > sel.to_year {
        return Err(DashError::InvalidSelection {
            from: sel.from_year,
            to: sel.to_year,
        });
    }
    for year in [sel.from_year, sel.to_year] {
        if !bounds.contains(year) {
            return Err(DashError::YearOutOfRange {
                year,
                min: bounds.min,
                max: bounds.max,
            });
        }
    }
    Ok(())
}
