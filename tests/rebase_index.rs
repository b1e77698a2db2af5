use gdp_dash::models::{DisplayMode, Observation};
use gdp_dash::pivot::{build_pivot, rebase};

fn pivot() -> gdp_dash::PivotTable {
    let obs = vec![
        Observation::new("A", 2000, Some(50.0)),
        Observation::new("A", 2001, Some(75.0)),
        Observation::new("A", 2002, Some(100.0)),
        Observation::new("B", 2000, None),
        Observation::new("B", 2001, Some(4.0)),
        Observation::new("C", 2000, Some(0.0)),
        Observation::new("C", 2001, Some(3.0)),
    ];
    build_pivot(&obs, None)
}

#[test]
fn absolute_mode_is_identity() {
    let p = pivot();
    let out = rebase(&p, DisplayMode::Absolute);
    assert_eq!(out.table, p);
    assert!(out.rebased.is_empty());
}

#[test]
fn base_year_becomes_exactly_one_hundred() {
    let p = pivot();
    let out = rebase(&p, DisplayMode::Rebased { base_year: 2000 });
    assert_eq!(out.table.get(2000, "A"), Some(100.0));
    assert_eq!(out.table.get(2001, "A"), Some(150.0));
    assert_eq!(out.table.get(2002, "A"), Some(200.0));
    assert_eq!(out.rebased, vec!["A".to_string()]);
}

#[test]
fn columns_without_usable_base_stay_absolute() {
    let p = pivot();
    let out = rebase(&p, DisplayMode::Rebased { base_year: 2000 });
    // B: base missing, C: base zero
    assert_eq!(out.table.column("B"), p.column("B"));
    assert_eq!(out.table.column("C"), p.column("C"));
}

#[test]
fn base_year_outside_rows_changes_nothing() {
    let p = pivot();
    let out = rebase(&p, DisplayMode::Rebased { base_year: 1990 });
    assert_eq!(out.table, p);
    assert!(out.rebased.is_empty());
}

#[test]
fn later_base_year_rebases_every_usable_column() {
    let p = pivot();
    let out = rebase(&p, DisplayMode::Rebased { base_year: 2001 });
    assert_eq!(out.table.get(2001, "A"), Some(100.0));
    assert_eq!(out.table.get(2001, "B"), Some(100.0));
    assert_eq!(out.table.get(2001, "C"), Some(100.0));
    assert_eq!(out.table.get(2000, "C"), Some(0.0));
    assert_eq!(out.rebased.len(), 3);
}
