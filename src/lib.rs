//! gdp_dash
//!
//! The data core of a small GDP exploration dashboard: reshape a wide
//! country x year table into tidy rows, filter by year range and countries,
//! and derive indicators, base-100 indices and rankings. Pairs with the
//! `gdp-dash` CLI.
//!
//! ### Features
//! - Wide-to-long reshaping with year bounds discovered from the header
//! - Best-effort country metadata (display name, region)
//! - Growth multiple and CAGR per country, with explicit "not applicable"
//! - Rebasing to an index (100 = base year), column by column
//! - Top-N country ranking and regional totals
//! - Long-format CSV/JSON export
//!
//! ### Example
//! ```no_run
//! use std::sync::Arc;
//! use gdp_dash::{DashboardConfig, Session, StaticCountryTable};
//! use gdp_dash::pipeline::DashboardView;
//!
//! let raw = gdp_dash::storage::load_wide_csv("gdp_data.csv")?;
//! let lookup = Arc::new(StaticCountryTable::embedded()?);
//! let mut session = Session::new(Arc::new(raw), lookup, DashboardConfig::default());
//! let sel = session.default_selection()?;
//! if let DashboardView::Ready(d) = session.compute(&sel)? {
//!     println!("{:#?}", d.indicators);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod indicators;
pub mod meta;
pub mod models;
pub mod pipeline;
pub mod pivot;
pub mod ranking;
pub mod storage;
pub mod transform;

pub use config::{DashboardConfig, TieBreak, YearBoundsPolicy};
pub use error::DashError;
pub use meta::{CountryInfo, CountryLookup, StaticCountryTable};
pub use models::{
    ChartKind, DisplayMode, IndicatorResult, Observation, PivotTable, RawRecord, RawTable,
    Selection,
};
pub use pipeline::Session;
