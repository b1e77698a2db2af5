use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the wide input table, as found in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub country_code: String,
    pub country_name: Option<String>,
    /// Year label (e.g. `"2010"`) -> cell value. Empty cells are `None`.
    pub values: BTreeMap<String, Option<f64>>,
}

impl RawRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            country_code: code.into(),
            country_name: None,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style helper, handy for tests and fixtures.
    pub fn with(mut self, year: &str, value: Option<f64>) -> Self {
        self.values.insert(year.to_string(), value);
        self
    }
}

/// The wide table: header labels in file order plus one record per country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Tidy structure used by this crate (one row = one observation).
///
/// `country_name` and `region` stay empty until [`crate::meta::join_metadata`]
/// fills them (a name present in the raw file is carried over by the transformer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country_code: String,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub year: i32,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(code: impl Into<String>, year: i32, value: Option<f64>) -> Self {
        Self {
            country_code: code.into(),
            country_name: None,
            region: None,
            year,
            value,
        }
    }
}

/// Inclusive year bounds the long table was derived under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Output of the wide-to-long transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTable {
    pub bounds: YearBounds,
    /// Country codes in input order.
    pub countries: Vec<String>,
    pub observations: Vec<Observation>,
}

/// Chart kinds the presentation layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

/// How pivot values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum DisplayMode {
    #[default]
    Absolute,
    /// Index with 100 = value at `base_year`.
    Rebased { base_year: i32 },
}

/// Rendering contract decided once per selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub chart: ChartKind,
    pub display: DisplayMode,
}

/// Display-mode choice before the base year is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexChoice {
    #[default]
    Absolute,
    Rebased,
}

/// A user's choice of year range and countries for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub from_year: i32,
    pub to_year: i32,
    pub countries: Vec<String>,
    #[serde(default)]
    pub chart: ChartKind,
    #[serde(default)]
    pub index: IndexChoice,
    /// Base year for rebasing; defaults to `from_year`.
    #[serde(default)]
    pub base_year: Option<i32>,
}

impl Selection {
    pub fn new(from_year: i32, to_year: i32, countries: Vec<String>) -> Self {
        Self {
            from_year,
            to_year,
            countries,
            chart: ChartKind::default(),
            index: IndexChoice::default(),
            base_year: None,
        }
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.from_year..=self.to_year).contains(&year)
    }

    pub fn render_plan(&self) -> RenderPlan {
        let display = match self.index {
            IndexChoice::Absolute => DisplayMode::Absolute,
            IndexChoice::Rebased => DisplayMode::Rebased {
                base_year: self.base_year.unwrap_or(self.from_year),
            },
        };
        RenderPlan {
            chart: self.chart,
            display,
        }
    }
}

/// Per-country indicators over a selected range. `None` means "not applicable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub country_code: String,
    pub first: Option<f64>,
    pub last: Option<f64>,
    pub growth: Option<f64>,
    /// Compound annual growth rate in percent, rounded to two decimals.
    pub cagr_pct: Option<f64>,
}

impl IndicatorResult {
    /// Last value divided by `scale` (e.g. `1e9` for billions).
    pub fn last_scaled(&self, scale: f64) -> Option<f64> {
        self.last.map(|v| v / scale)
    }
}

/// Year x country matrix used for charting and rebasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Row index, ascending.
    pub years: Vec<i32>,
    /// Column index.
    pub countries: Vec<String>,
    /// `cells[row][col]`
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn get(&self, year: i32, country: &str) -> Option<f64> {
        let row = self.years.iter().position(|y| *y == year)?;
        let col = self.countries.iter().position(|c| c == country)?;
        self.cells[row][col]
    }

    /// All values of one country column, top to bottom.
    pub fn column(&self, country: &str) -> Option<Vec<Option<f64>>> {
        let col = self.countries.iter().position(|c| c == country)?;
        Some(self.cells.iter().map(|row| row[col]).collect())
    }
}

/// One entry of a ranking list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: usize,
    pub key: String,
    pub value: f64,
}
