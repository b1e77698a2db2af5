//! Full pipeline: wide table -> session -> dashboard view.

use gdp_dash::meta::{CountryInfo, StaticCountryTable};
use gdp_dash::models::{ChartKind, DisplayMode, IndexChoice, RawRecord, RawTable, Selection};
use gdp_dash::pipeline::{DashboardView, Session, check_selection};
use gdp_dash::{DashError, DashboardConfig, YearBoundsPolicy};
use std::sync::Arc;

fn raw() -> RawTable {
    RawTable {
        headers: vec!["Country Code".into(), "2000".into(), "2010".into()],
        records: vec![
            RawRecord::new("A")
                .with("2000", Some(100.0))
                .with("2010", Some(200.0)),
            RawRecord::new("B").with("2000", Some(50.0)).with("2010", None),
        ],
    }
}

fn session() -> Session {
    let lookup = StaticCountryTable::from_entries(
        "test",
        [CountryInfo {
            code: "A".into(),
            name: "Alpha".into(),
            region: "North".into(),
        }],
    );
    Session::new(Arc::new(raw()), Arc::new(lookup), DashboardConfig::default())
}

fn ready(view: DashboardView) -> Box<gdp_dash::pipeline::Dashboard> {
    match view {
        DashboardView::Ready(d) => d,
        DashboardView::NoData { .. } => panic!("expected data"),
    }
}

#[test]
fn worked_example() {
    let mut s = session();
    let sel = Selection::new(2000, 2010, vec!["A".into(), "B".into()]);
    let d = ready(s.compute(&sel).unwrap());

    let obs: Vec<(&str, i32, Option<f64>)> = d
        .observations
        .iter()
        .map(|o| (o.country_code.as_str(), o.year, o.value))
        .collect();
    assert_eq!(
        obs,
        vec![
            ("A", 2000, Some(100.0)),
            ("A", 2010, Some(200.0)),
            ("B", 2000, Some(50.0)),
            ("B", 2010, None),
        ]
    );

    let a = &d.indicators[0];
    assert_eq!(a.country_code, "A");
    assert!((a.growth.unwrap() - 2.0).abs() < 1e-12);
    assert_eq!(a.cagr_pct, Some(7.18));

    let b = &d.indicators[1];
    assert_eq!(b.growth, None);
    assert_eq!(b.cagr_pct, None);
}

#[test]
fn metadata_is_joined_best_effort() {
    let mut s = session();
    let table = s.long_table().unwrap();
    assert_eq!(table.observations.len(), 4);
    let a = table.observations.iter().find(|o| o.country_code == "A").unwrap();
    assert_eq!(a.country_name.as_deref(), Some("Alpha"));
    assert_eq!(a.region.as_deref(), Some("North"));
    let b = table.observations.iter().find(|o| o.country_code == "B").unwrap();
    assert_eq!(b.region, None);
}

#[test]
fn empty_selection_is_soft() {
    let mut s = session();
    let sel = Selection::new(2000, 2010, vec![]);
    assert!(matches!(s.compute(&sel).unwrap(), DashboardView::NoData { .. }));
}

#[test]
fn rebased_plan_defaults_base_to_range_start() {
    let mut s = session();
    let mut sel = Selection::new(2000, 2010, vec!["A".into(), "B".into()]);
    sel.chart = ChartKind::Bar;
    sel.index = IndexChoice::Rebased;
    let d = ready(s.compute(&sel).unwrap());
    assert_eq!(d.plan.chart, ChartKind::Bar);
    assert_eq!(d.plan.display, DisplayMode::Rebased { base_year: 2000 });
    assert_eq!(d.chart.table.get(2000, "A"), Some(100.0));
    assert_eq!(d.chart.table.get(2010, "A"), Some(200.0));
    assert_eq!(d.chart.table.get(2000, "B"), Some(100.0));
}

#[test]
fn rankings_use_selection_end_year() {
    let mut s = session();
    let sel = Selection::new(2000, 2000, vec!["A".into()]);
    let d = ready(s.compute(&sel).unwrap());
    assert_eq!(d.ranking_year, 2000);
    let keys: Vec<&str> = d.top_countries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(d.regions[0].key, "North");
    assert_eq!(d.regions[1].key, "Unknown");
}

#[test]
fn reshaping_is_memoized_until_input_changes() {
    let mut s = session();
    let first = s.long_table().unwrap();
    let again = s.long_table().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let mut changed = raw();
    changed.records[1].values.insert("2010".into(), Some(75.0));
    s.replace_input(Arc::new(changed));
    let after = s.long_table().unwrap();
    assert!(!Arc::ptr_eq(&first, &after));
}

#[test]
fn configuration_error_halts_pipeline() {
    let bad = RawTable {
        headers: vec!["Country Code".into()],
        records: vec![RawRecord::new("A")],
    };
    let mut s = Session::new(
        Arc::new(bad),
        Arc::new(StaticCountryTable::default()),
        DashboardConfig::default(),
    );
    let sel = Selection::new(2000, 2010, vec!["A".into()]);
    assert!(matches!(s.compute(&sel), Err(DashError::Configuration(_))));
}

#[test]
fn selection_outside_bounds_is_rejected() {
    let mut s = session();
    let bounds = s.year_bounds().unwrap();
    assert!(check_selection(&Selection::new(2000, 2010, vec![]), bounds).is_ok());
    assert!(matches!(
        check_selection(&Selection::new(1990, 2010, vec![]), bounds),
        Err(DashError::YearOutOfRange { year: 1990, .. })
    ));
}

#[test]
fn default_selection_covers_full_range() {
    let mut s = session();
    let sel = s.default_selection().unwrap();
    assert_eq!((sel.from_year, sel.to_year), (2000, 2010));
    // none of the default countries exist in this table
    assert!(sel.countries.is_empty());
}

#[test]
fn default_selection_ends_on_last_year_with_data() {
    let lookup = StaticCountryTable::from_entries("test", Vec::<CountryInfo>::new());
    let config = DashboardConfig {
        year_bounds: YearBoundsPolicy::ExtendMaxTo(2030),
        default_countries: vec!["A".into()],
        ..DashboardConfig::default()
    };
    let mut s = Session::new(Arc::new(raw()), Arc::new(lookup), config);
    assert_eq!(s.year_bounds().unwrap().max, 2030);

    let sel = s.default_selection().unwrap();
    assert_eq!((sel.from_year, sel.to_year), (2000, 2010));
    let d = ready(s.compute(&sel).unwrap());
    assert_eq!(d.ranking_year, 2010);
    assert_eq!(d.top_countries.len(), 1);
    assert_eq!(d.indicators[0].growth, Some(2.0));
}
